//! Configuration loading utilities
//!
//! Settings can come from a YAML file, from `FANOUT_*` environment variables,
//! or both (environment applied on top of the file).

use super::models::BatchSettings;
use super::validation::Validate;
use crate::utils::error::{FanoutError, Result};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use tracing::{debug, info};

pub const ENV_ITERATION_STEP: &str = "FANOUT_ITERATION_STEP";
pub const ENV_REQUEST_ATTEMPTS: &str = "FANOUT_REQUEST_ATTEMPTS";
pub const ENV_JITTER_MS: &str = "FANOUT_JITTER_MS";
pub const ENV_BATCH_PAUSE_MS: &str = "FANOUT_BATCH_PAUSE_MS";
pub const ENV_BACKOFF_MS: &str = "FANOUT_BACKOFF_MS";

impl BatchSettings {
    /// Load settings from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading batch settings from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;

        let settings = Self::from_yaml_str(&content)?;
        debug!("Batch settings loaded successfully");
        Ok(settings)
    }

    /// Parse and validate settings from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(content)?;

        settings.validate().map_err(FanoutError::Config)?;
        Ok(settings)
    }

    /// Load settings from environment variables, defaulting whatever is unset
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    /// Override fields with any `FANOUT_*` environment variables that are set
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| env::var(key).ok())
    }

    fn apply_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Applying batch settings from environment variables");

        if let Some(step) = lookup(ENV_ITERATION_STEP) {
            self.iteration_step = step.trim().parse().map_err(|e| {
                FanoutError::Config(format!("Invalid {}: {}", ENV_ITERATION_STEP, e))
            })?;
        }
        if let Some(attempts) = lookup(ENV_REQUEST_ATTEMPTS) {
            self.request_attempts = attempts.trim().parse().map_err(|e| {
                FanoutError::Config(format!("Invalid {}: {}", ENV_REQUEST_ATTEMPTS, e))
            })?;
        }
        if let Some(jitter) = lookup(ENV_JITTER_MS) {
            self.jitter_interval_ms = jitter
                .trim()
                .parse()
                .map_err(|e| FanoutError::Config(format!("Invalid {}: {}", ENV_JITTER_MS, e)))?;
        }
        if let Some(pause) = lookup(ENV_BATCH_PAUSE_MS) {
            self.batch_pause_ms = pause.trim().parse().map_err(|e| {
                FanoutError::Config(format!("Invalid {}: {}", ENV_BATCH_PAUSE_MS, e))
            })?;
        }
        if let Some(table) = lookup(ENV_BACKOFF_MS) {
            self.backoff_intervals_ms = parse_backoff_table(&table)?;
        }

        self.validate().map_err(FanoutError::Config)?;
        Ok(self)
    }
}

/// Parse `attempts_left:millis` pairs separated by commas, e.g. `2:1000,1:5000`
pub fn parse_backoff_table(raw: &str) -> Result<BTreeMap<u32, u64>> {
    let mut table = BTreeMap::new();

    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, value) = entry.split_once(':').ok_or_else(|| {
            FanoutError::Config(format!(
                "Invalid {} entry '{}': expected attempts:millis",
                ENV_BACKOFF_MS, entry
            ))
        })?;

        let key: u32 = key.trim().parse().map_err(|e| {
            FanoutError::Config(format!("Invalid {} key '{}': {}", ENV_BACKOFF_MS, key, e))
        })?;
        let value: u64 = value.trim().parse().map_err(|e| {
            FanoutError::Config(format!(
                "Invalid {} value '{}': {}",
                ENV_BACKOFF_MS, value, e
            ))
        })?;

        table.insert(key, value);
    }

    Ok(table)
}
