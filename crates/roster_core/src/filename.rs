use chrono::{DateTime, SecondsFormat, Utc};

use crate::ExportFormat;

pub const EXPORT_FILE_STEM: &str = "professors";

/// Length of the `-mmmZ` tail left after sanitizing a millisecond timestamp.
const FRACTION_SUFFIX_LEN: usize = 5;

/// `professors_<timestamp>.<ext>` for a payload received at `at`.
pub fn export_file_name(at: DateTime<Utc>, format: ExportFormat) -> String {
    format!(
        "{EXPORT_FILE_STEM}_{}.{}",
        file_safe_timestamp(at),
        format.extension()
    )
}

/// `2024-05-01T12:30:00.000Z` becomes `2024-05-01T12-30-00`.
pub fn file_safe_timestamp(at: DateTime<Utc>) -> String {
    let iso = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut sanitized: String = iso
        .chars()
        .map(|c| if matches!(c, ':' | '.') { '-' } else { c })
        .collect();
    sanitized.truncate(sanitized.len().saturating_sub(FRACTION_SUFFIX_LEN));
    sanitized
}
