//! Configuration models

use crate::utils::logging::{Logger, TracingLogger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Smallest fan-out width a batch can be dispatched with
pub const MIN_ITERATION_STEP: usize = 2;

/// Runtime configuration of a batch client
#[derive(Clone)]
pub struct BatchClientConfig {
    /// Fan-out width: number of requests launched together in one aligned wave
    pub iteration_step: usize,
    /// Attempt budget per request
    pub request_attempts: u32,
    /// Base backoff keyed by the number of attempts still remaining
    pub backoff_intervals: BTreeMap<u32, Duration>,
    /// Upper bound (exclusive) of the random delay added to each backoff
    pub jitter_interval: Duration,
    /// Pause between launching consecutive aligned waves
    pub batch_pause: Duration,
    /// Sink for per-request warnings and errors
    pub logger: Arc<dyn Logger>,
}

impl fmt::Debug for BatchClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchClientConfig")
            .field("iteration_step", &self.iteration_step)
            .field("request_attempts", &self.request_attempts)
            .field("backoff_intervals", &self.backoff_intervals)
            .field("jitter_interval", &self.jitter_interval)
            .field("batch_pause", &self.batch_pause)
            .field("logger", &"<logger>")
            .finish()
    }
}

impl Default for BatchClientConfig {
    fn default() -> Self {
        Self::default_with_logger(TracingLogger::shared())
    }
}

impl BatchClientConfig {
    /// Defaults: one request per CPU per wave, three attempts,
    /// 500ms/1s/5s backoff, 500ms jitter and a 100ms pause between waves
    pub fn default_with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            iteration_step: default_iteration_step(),
            request_attempts: 3,
            backoff_intervals: default_backoff_intervals(),
            jitter_interval: Duration::from_millis(500),
            batch_pause: Duration::from_millis(100),
            logger,
        }
    }

    /// Set the fan-out width
    pub fn with_iteration_step(mut self, iteration_step: usize) -> Self {
        self.iteration_step = iteration_step;
        self
    }

    /// Set the attempt budget per request
    pub fn with_request_attempts(mut self, request_attempts: u32) -> Self {
        self.request_attempts = request_attempts;
        self
    }

    /// Replace the whole backoff table
    pub fn with_backoff_intervals(mut self, backoff_intervals: BTreeMap<u32, Duration>) -> Self {
        self.backoff_intervals = backoff_intervals;
        self
    }

    /// Set the base backoff used when `attempts_left` attempts remain
    pub fn with_backoff(mut self, attempts_left: u32, delay: Duration) -> Self {
        self.backoff_intervals.insert(attempts_left, delay);
        self
    }

    /// Set the jitter upper bound
    pub fn with_jitter_interval(mut self, jitter_interval: Duration) -> Self {
        self.jitter_interval = jitter_interval;
        self
    }

    /// Set the pause between aligned waves
    pub fn with_batch_pause(mut self, batch_pause: Duration) -> Self {
        self.batch_pause = batch_pause;
        self
    }

    /// Set the warning/error sink
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Base backoff for the given number of remaining attempts; zero when unset
    pub fn backoff_for(&self, attempts_left: u32) -> Duration {
        self.backoff_intervals
            .get(&attempts_left)
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Attempts-left values that will be looked up but have no backoff entry
    pub fn missing_backoff_keys(&self) -> Vec<u32> {
        (1..self.request_attempts)
            .filter(|key| !self.backoff_intervals.contains_key(key))
            .collect()
    }
}

fn default_iteration_step() -> usize {
    num_cpus::get().max(MIN_ITERATION_STEP)
}

fn default_backoff_intervals() -> BTreeMap<u32, Duration> {
    BTreeMap::from([
        (3, Duration::from_millis(500)),
        (2, Duration::from_millis(1000)),
        (1, Duration::from_millis(5000)),
    ])
}

/// Serializable batch settings, durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub iteration_step: usize,
    pub request_attempts: u32,
    pub jitter_interval_ms: u64,
    pub batch_pause_ms: u64,
    pub backoff_intervals_ms: BTreeMap<u32, u64>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            iteration_step: default_iteration_step(),
            request_attempts: 3,
            jitter_interval_ms: 500,
            batch_pause_ms: 100,
            backoff_intervals_ms: default_backoff_intervals()
                .into_iter()
                .map(|(k, v)| (k, v.as_millis() as u64))
                .collect(),
        }
    }
}

impl BatchSettings {
    /// Build the runtime configuration with the given logger
    pub fn into_config(self, logger: Arc<dyn Logger>) -> BatchClientConfig {
        BatchClientConfig {
            iteration_step: self.iteration_step,
            request_attempts: self.request_attempts,
            backoff_intervals: self
                .backoff_intervals_ms
                .into_iter()
                .map(|(k, v)| (k, Duration::from_millis(v)))
                .collect(),
            jitter_interval: Duration::from_millis(self.jitter_interval_ms),
            batch_pause: Duration::from_millis(self.batch_pause_ms),
            logger,
        }
    }
}
