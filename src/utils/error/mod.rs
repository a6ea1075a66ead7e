//! Error handling for the batch client
//!
//! This module defines the error taxonomy shared by the transport, the
//! retrying requester and the batch dispatcher.

mod conversions;
mod helpers;
mod types;

pub use types::{FanoutError, Result};
