//! Where fallback activations are announced.

use log::warn;

/// Fire-and-forget sink for short user-facing notices.
///
/// A UI front-end shows these as toasts. Without a UI the default
/// [`LogNotifier`] writes them to the log. Closures taking `&str` are notifiers too.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{}", message);
    }
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}
