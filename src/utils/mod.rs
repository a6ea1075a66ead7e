//! Utility modules for the batch client
//!
//! - **error**: error taxonomy and conversions
//! - **logging**: the logger collaborator and subscriber setup
//! - **sleeper**: the backoff sleep seam

pub mod error;
pub mod logging;
pub mod sleeper;

pub use error::{FanoutError, Result};
pub use logging::{Logger, TracingLogger};
pub use sleeper::{Sleeper, TokioSleeper};
