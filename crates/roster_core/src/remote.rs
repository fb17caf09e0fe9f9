//! Outcomes of the two remote operations, as the state machine sees them.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeReply {
    pub records: Vec<Record>,
    /// Count reported by the service; shown in the success message.
    pub count: usize,
}

/// Opaque exported file body plus the moment it was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// The service answered with an error message of its own.
    Service(String),
    /// The service answered with a failure status but no usable message.
    Status(u16),
    /// No usable response: network failure, timeout or undecodable body.
    Transport(String),
}

impl RemoteFailure {
    /// Text shown to the user. Service messages are passed through verbatim;
    /// transport details are never shown.
    pub fn user_message(&self, rejected: &str, unreachable: &str) -> String {
        match self {
            RemoteFailure::Service(message) => message.clone(),
            RemoteFailure::Status(_) => rejected.to_string(),
            RemoteFailure::Transport(_) => unreachable.to_string(),
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteFailure::Service(message) => write!(f, "service error: {message}"),
            RemoteFailure::Status(code) => write!(f, "http status {code}"),
            RemoteFailure::Transport(detail) => write!(f, "transport error: {detail}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Value sent in the export request body.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Upper-case name used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported export format: {0}")]
pub struct UnsupportedFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}
