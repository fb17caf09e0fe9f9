use crate::view_model::{record_rows, AppViewModel, DisplayMode};
use crate::{Effect, NoticeId, NoticeKind, Notification, Record, NOTICE_TIMEOUT};

/// Last-fetched records and the scrape in-flight flag.
///
/// A plain value holder: it validates nothing and notifies nobody. Callers
/// decide when to re-render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestState {
    records: Vec<Record>,
    is_loading: bool,
}

impl RequestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Replaces the whole dataset. Records are never merged across requests.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    request: RequestState,
    input: String,
    notice: Option<Notification>,
    last_notice_id: NoticeId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        let records = self.request.records();
        let mode = if self.request.is_loading() {
            DisplayMode::Loading
        } else if records.is_empty() {
            DisplayMode::Empty
        } else {
            DisplayMode::Results
        };

        AppViewModel {
            mode,
            rows: record_rows(records),
            total_count: records.len(),
            export_visible: !records.is_empty(),
            scrape_enabled: !self.request.is_loading(),
            notification: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
    }

    pub(crate) fn begin_scrape(&mut self) {
        self.request.set_loading(true);
        self.dirty = true;
    }

    pub(crate) fn finish_scrape(&mut self, records: Vec<Record>) {
        self.request.replace_records(records);
        self.request.set_loading(false);
        self.dirty = true;
    }

    /// Shows `message`, replacing whatever notification is current, and
    /// returns the effect that will dismiss it.
    pub(crate) fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) -> Effect {
        self.last_notice_id += 1;
        let id = self.last_notice_id;
        self.notice = Some(Notification {
            id,
            kind,
            message: message.into(),
        });
        self.dirty = true;
        Effect::ScheduleDismiss {
            notice_id: id,
            after: NOTICE_TIMEOUT,
        }
    }

    /// Timers of replaced notifications are stale and ignored.
    pub(crate) fn expire_notice(&mut self, id: NoticeId) {
        if self.notice.as_ref().is_some_and(|notice| notice.id == id) {
            self.notice = None;
            self.dirty = true;
        }
    }
}
