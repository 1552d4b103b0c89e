//! User-visible notices.
//!
//! Feature modules and the persistence gateway report status through a
//! [`Notifier`]; they never print or render anything themselves.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    /// How long a front-end should keep it visible.
    pub duration: Duration,
}

impl Notice {
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

    pub fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration: Self::DEFAULT_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Sink for [`Notice`]s.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, message: &str) {
        self.notify(Notice::new(message, NoticeKind::Success));
    }

    fn error(&self, message: &str) {
        self.notify(Notice::new(message, NoticeKind::Error));
    }

    fn info(&self, message: &str) {
        self.notify(Notice::new(message, NoticeKind::Info));
    }

    fn warning(&self, message: &str) {
        self.notify(Notice::new(message, NoticeKind::Warning));
    }
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::error!(target: "keepsake::notice", "{}", notice.message),
            NoticeKind::Warning => tracing::warn!(target: "keepsake::notice", "{}", notice.message),
            NoticeKind::Success | NoticeKind::Info => {
                tracing::info!(target: "keepsake::notice", kind = %notice.kind, "{}", notice.message);
            }
        }
    }
}

/// Collects notices until a front-end drains them.
///
/// A notice identical to the newest undrained one is counted instead of
/// queued again, so a burst of equal failures shows up once.
#[derive(Debug, Default)]
pub struct NoticeLog {
    inner: Mutex<NoticeLogInner>,
}

#[derive(Debug, Default)]
struct NoticeLogInner {
    pending: Vec<Notice>,
    suppressed: usize,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut inner = self.inner.lock();
        inner.suppressed = 0;
        std::mem::take(&mut inner.pending)
    }

    /// Copy of the pending notices.
    pub fn snapshot(&self) -> Vec<Notice> {
        self.inner.lock().pending.clone()
    }

    /// Duplicates dropped since the last drain.
    pub fn suppressed(&self) -> usize {
        self.inner.lock().suppressed
    }

    pub fn last(&self) -> Option<Notice> {
        self.inner.lock().pending.last().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().pending.is_empty()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = %notice.kind, message = %notice.message, "notice");
        let mut inner = self.inner.lock();
        if inner.pending.last() == Some(&notice) {
            inner.suppressed += 1;
            return;
        }
        inner.pending.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_coalesces_consecutive_duplicates() {
        let log = NoticeLog::new();
        log.error("Could not reach the server");
        log.error("Could not reach the server");
        log.warning("Saved locally only");
        log.error("Could not reach the server");

        assert_eq!(log.suppressed(), 1);
        let drained = log.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[1].kind, NoticeKind::Warning);
        assert!(log.is_empty());
        assert_eq!(log.suppressed(), 0);
    }

    #[test]
    fn notice_display_includes_kind() {
        let notice = Notice::new("Saved", NoticeKind::Success);
        assert_eq!(notice.to_string(), "[success] Saved");
        assert_eq!(notice.duration, Duration::from_secs(5));
    }
}
