use tracing::info;

/// Severity attached to a notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
        }
    }
}

/// Transient notification emitted after a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Delivery mechanism for notifications; the rendering layer supplies one.
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification);
}

/// Sink that forwards notifications to the tracing pipeline.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notification: &Notification) {
        info!(
            severity = notification.severity.as_str(),
            title = %notification.title,
            "{}",
            notification.message
        );
    }
}
