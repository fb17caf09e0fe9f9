use std::fmt;

use serde::{Deserialize, Serialize};

/// A professor entry as it travels over the wire. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub data: Vec<RemoteRecord>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// File formats the export endpoint produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteFormat {
    Csv,
    Json,
}

impl fmt::Display for RemoteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteFormat::Csv => f.write_str("csv"),
            RemoteFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest<'a> {
    pub data: &'a [RemoteRecord],
    pub format: RemoteFormat,
}

/// Body of a non-2xx reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOutput {
    pub records: Vec<RemoteRecord>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub(crate) fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True when no usable response was obtained at all.
    pub fn is_transport(&self) -> bool {
        !matches!(
            self.kind,
            RemoteErrorKind::Service | RemoteErrorKind::HttpStatus(_)
        )
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for RemoteError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Non-2xx reply carrying `{error: ...}`; the message is the service's text.
    Service,
    /// Non-2xx reply without an error message.
    HttpStatus(u16),
    InvalidEndpoint,
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorKind::Service => write!(f, "service error"),
            RemoteErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            RemoteErrorKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            RemoteErrorKind::Timeout => write!(f, "timeout"),
            RemoteErrorKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            RemoteErrorKind::Decode => write!(f, "undecodable response"),
            RemoteErrorKind::Network => write!(f, "network error"),
        }
    }
}
