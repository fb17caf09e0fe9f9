use crate::{Notification, Record, PLACEHOLDER};

/// Which of the three mutually exclusive panels is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    Loading,
    #[default]
    Empty,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mode: DisplayMode,
    pub rows: Vec<RecordRow>,
    pub total_count: usize,
    pub export_visible: bool,
    pub scrape_enabled: bool,
    pub notification: Option<Notification>,
    pub dirty: bool,
}

/// One table row, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    /// 1-based position in the dataset.
    pub index: usize,
    pub name: String,
    pub email: String,
    pub department: String,
}

/// Maps records to table rows in order, filling absent fields with [`PLACEHOLDER`].
pub fn record_rows(records: &[Record]) -> Vec<RecordRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| RecordRow {
            index: i + 1,
            name: display_field(record.name.as_deref()),
            email: display_field(record.email.as_deref()),
            department: display_field(record.department.as_deref()),
        })
        .collect()
}

fn display_field(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
