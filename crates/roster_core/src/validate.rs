use url::Url;

use crate::Record;

/// Input problems caught locally; none of them reach the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty url")]
    EmptyUrl,
    #[error("malformed url")]
    MalformedUrl,
    #[error("nothing to export")]
    NothingToExport,
}

impl ValidationError {
    /// Notification text for this error.
    pub fn user_message(self) -> &'static str {
        match self {
            ValidationError::EmptyUrl => "請輸入網址",
            ValidationError::MalformedUrl => "請輸入有效的網址格式",
            ValidationError::NothingToExport => "沒有資料可匯出",
        }
    }
}

/// Trims the raw input and checks that it is a well-formed absolute URL.
/// Returns the trimmed text, which is what gets sent to the service.
pub fn validate_url(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    Url::parse(trimmed).map_err(|_| ValidationError::MalformedUrl)?;
    Ok(trimmed)
}

pub fn ensure_exportable(records: &[Record]) -> Result<(), ValidationError> {
    if records.is_empty() {
        Err(ValidationError::NothingToExport)
    } else {
        Ok(())
    }
}
