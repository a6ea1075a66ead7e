//! Logging utilities
//!
//! The batch engine reports per-request warnings and terminal failures through
//! the [`Logger`] collaborator; the default implementation forwards to `tracing`.

pub mod logger;
pub mod subscriber;

pub use logger::{Logger, TracingLogger};
pub use subscriber::{LogFormat, init_subscriber};
