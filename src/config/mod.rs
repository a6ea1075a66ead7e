//! Configuration management for the batch client
//!
//! [`BatchClientConfig`] is the immutable runtime configuration handed to a
//! [`crate::BatchClient`]. [`BatchSettings`] is its serializable form, loaded
//! from YAML files or `FANOUT_*` environment variables.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::{BatchClientConfig, BatchSettings};
pub use validation::Validate;
