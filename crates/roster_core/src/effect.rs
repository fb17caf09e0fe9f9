use std::time::Duration;

use crate::{ExportFormat, NoticeId, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the remote scrape operation once for `url`.
    Scrape { url: String },
    /// Call the remote export operation once with a snapshot of the records.
    Export {
        records: Vec<Record>,
        format: ExportFormat,
    },
    /// Save an exported payload under `file_name`.
    SaveDownload {
        file_name: String,
        bytes: Vec<u8>,
        format: ExportFormat,
    },
    /// Deliver `Msg::NoticeExpired(notice_id)` after `after` has elapsed.
    ScheduleDismiss { notice_id: NoticeId, after: Duration },
}
