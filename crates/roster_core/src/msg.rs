use std::path::PathBuf;

use crate::{ExportFormat, ExportPayload, NoticeId, RemoteFailure, ScrapeReply};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    InputChanged(String),
    /// User clicked the scrape trigger or pressed Enter in the input.
    ScrapeSubmitted,
    /// The remote scrape call completed, successfully or not.
    ScrapeFinished(Result<ScrapeReply, RemoteFailure>),
    /// User clicked the export trigger.
    ExportClicked(ExportFormat),
    /// The remote export call completed.
    ExportFinished {
        format: ExportFormat,
        result: Result<ExportPayload, RemoteFailure>,
    },
    /// The exported payload was written to disk (or failed to be).
    DownloadSaved {
        format: ExportFormat,
        result: Result<PathBuf, String>,
    },
    /// The dismissal timer for a notification fired.
    NoticeExpired(NoticeId),
}
