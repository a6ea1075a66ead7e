use std::error::Error;
use std::sync::Arc;

/// Sink for warnings and errors raised while executing requests.
///
/// Calls are fire-and-forget: implementations must not block the calling
/// worker task for any meaningful amount of time.
pub trait Logger: Send + Sync {
    fn log_warn(&self, message: &str);

    fn log_error(&self, error: &dyn Error, message: &str);
}

/// Forwards to the `tracing` macros under the `fanout_http` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn shared() -> Arc<dyn Logger> {
        Arc::new(Self)
    }
}

impl Logger for TracingLogger {
    fn log_warn(&self, message: &str) {
        tracing::warn!(target: "fanout_http", "{}", message);
    }

    fn log_error(&self, error: &dyn Error, message: &str) {
        tracing::error!(target: "fanout_http", error = %error, "{}", message);
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log_warn(&self, message: &str) {
        (**self).log_warn(message)
    }

    fn log_error(&self, error: &dyn Error, message: &str) {
        (**self).log_error(error, message)
    }
}
