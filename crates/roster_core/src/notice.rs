use std::time::Duration;

/// How long a notification stays visible before it is dismissed.
pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);

pub type NoticeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient user-facing message. Only the most recent one is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub message: String,
}
