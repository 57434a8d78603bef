use tokio::sync::mpsc;

/// Non-blocking user notifications (toasts).
pub trait Notifier: Send + Sync + 'static {
    fn error(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
}

impl Notifier for mpsc::UnboundedSender<Notification> {
    fn error(&self, message: &str) {
        if self.send(Notification::Error(message.to_string())).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

/// Writes notifications to the log, for hosts without a toast surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(message, "verification notification");
    }
}
