//! Configuration validation
//!
//! Rules shared by the runtime configuration and its serializable form:
//! the fan-out width must be at least 2 and every request needs at least
//! one attempt.

use super::models::{BatchClientConfig, BatchSettings, MIN_ITERATION_STEP};

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn validate_limits(iteration_step: usize, request_attempts: u32) -> Result<(), String> {
    if iteration_step < MIN_ITERATION_STEP {
        return Err(format!(
            "the batch iteration step must be at least {}, got {}",
            MIN_ITERATION_STEP, iteration_step
        ));
    }

    if request_attempts < 1 {
        return Err("the number of request attempts must be at least 1".to_string());
    }

    Ok(())
}

impl Validate for BatchClientConfig {
    fn validate(&self) -> Result<(), String> {
        validate_limits(self.iteration_step, self.request_attempts)
    }
}

impl Validate for BatchSettings {
    fn validate(&self) -> Result<(), String> {
        validate_limits(self.iteration_step, self.request_attempts)
    }
}
