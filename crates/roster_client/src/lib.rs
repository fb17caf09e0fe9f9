//! Roster client: the remote scrape/export service and download persistence.
mod engine;
mod persist;
mod remote;
mod types;

pub use engine::{RemoteEvent, RemoteHandle};
pub use persist::{ensure_output_dir, DownloadWriter, PersistError};
pub use remote::{HttpRemoteService, RemoteService, RemoteSettings};
pub use types::{
    ErrorBody, ExportRequest, RemoteError, RemoteErrorKind, RemoteFormat, RemoteRecord,
    ScrapeOutput, ScrapeRequest, ScrapeResponse,
};
