//! Roster core: pure request/state machine and view-model helpers.
mod effect;
mod filename;
mod msg;
mod notice;
mod record;
mod remote;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use filename::{export_file_name, file_safe_timestamp, EXPORT_FILE_STEM};
pub use msg::Msg;
pub use notice::{NoticeId, NoticeKind, Notification, NOTICE_TIMEOUT};
pub use record::{Record, PLACEHOLDER};
pub use remote::{ExportFormat, ExportPayload, RemoteFailure, ScrapeReply, UnsupportedFormat};
pub use state::{AppState, RequestState};
pub use update::update;
pub use validate::{ensure_exportable, validate_url, ValidationError};
pub use view_model::{record_rows, AppViewModel, DisplayMode, RecordRow};
