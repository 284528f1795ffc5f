use tracing::error;

/// Where user-facing failures are reported.
pub trait Notifier {
    fn error(&self, message: &str);
}

/// Reports through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        error!("{message}");
    }
}
