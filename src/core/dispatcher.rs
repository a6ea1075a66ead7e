//! Batch dispatch
//!
//! A batch is split into waves of exactly `iteration_step` requests plus an
//! unaligned tail. Each wave is launched at once, followed by the configured
//! pause before the next wave is launched; the pause does not wait for the
//! wave to complete, so slow waves overlap in flight. The tail is launched
//! in one go after the last wave. Results are gathered in completion order.

use super::partition::align_vec;
use super::requester::RetryingRequester;
use super::types::{BatchReport, BatchSummary, FailedRequest, SyncedRequest, SyncedResult};
use super::workers::{Outcome, WorkerGroup};
use crate::config::{BatchClientConfig, Validate};
use crate::decode::{Decoder, JsonDecoder};
use crate::transport::{HttpRequest, Transport};
use crate::utils::error::{FanoutError, Result};
use crate::utils::sleeper::{Sleeper, TokioSleeper};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

/// Batch HTTP client producing values of type `T`
pub struct BatchClient<T> {
    config: Arc<BatchClientConfig>,
    requester: RetryingRequester<T>,
    wave_sleeper: Arc<dyn Sleeper>,
}

impl<T> Clone for BatchClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            requester: self.requester.clone(),
            wave_sleeper: Arc::clone(&self.wave_sleeper),
        }
    }
}

impl<T> BatchClient<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Create a client decoding JSON response bodies
    pub fn new(config: BatchClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_decoder(config, transport, Arc::new(JsonDecoder::new()))
    }
}

impl<T> BatchClient<T>
where
    T: Send + 'static,
{
    /// Create a client with a custom decoder.
    ///
    /// Fails with [`FanoutError::Config`] when the fan-out width is below 2 or
    /// the attempt budget is zero. Gaps in the backoff table are reported to
    /// the configured logger.
    pub fn with_decoder(
        config: BatchClientConfig,
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn Decoder<T>>,
    ) -> Result<Self> {
        config.validate().map_err(FanoutError::Config)?;

        let missing = config.missing_backoff_keys();
        if !missing.is_empty() {
            config.logger.log_warn(&format!(
                "No backoff interval configured for attempts left {:?}; only jitter will apply",
                missing
            ));
        }

        let config = Arc::new(config);
        let requester = RetryingRequester::new(
            Arc::clone(&config),
            transport,
            decoder,
            Arc::new(TokioSleeper),
        );

        Ok(Self {
            config,
            requester,
            wave_sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used for retry backoff
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.requester = self.requester.with_sleeper(sleeper);
        self
    }

    /// Replace the sleeper used for the pause between waves
    pub fn with_wave_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.wave_sleeper = sleeper;
        self
    }

    /// Validated configuration shared by every request
    pub fn config(&self) -> &BatchClientConfig {
        &self.config
    }

    /// Execute a single request with retries, without batching
    pub async fn execute_one(&self, request: &HttpRequest) -> Result<T> {
        self.requester.execute(request).await
    }

    /// Dispatch unkeyed requests; failed requests are left out.
    ///
    /// Output order follows completion, not input order.
    pub async fn dispatch(&self, requests: Vec<HttpRequest>) -> Vec<T> {
        let items = requests.into_iter().map(SyncedRequest::from).collect();
        self.dispatch_with_keys(items)
            .await
            .into_iter()
            .map(|synced| synced.result)
            .collect()
    }

    /// Dispatch keyed requests; each result carries its request's key.
    /// Failed requests are left out.
    pub async fn dispatch_with_keys(&self, items: Vec<SyncedRequest>) -> Vec<SyncedResult<T>> {
        self.dispatch_with_report(items).await.into_results()
    }

    /// Dispatch keyed requests and report failures alongside results
    pub async fn dispatch_with_report(&self, items: Vec<SyncedRequest>) -> BatchReport<T> {
        let started = Instant::now();
        let total = items.len();
        let iteration_step = self.config.iteration_step;

        let (aligned, unaligned) = align_vec(items, iteration_step);
        let waves = aligned.len() / iteration_step;
        let tail = unaligned.len();

        let (mut workers, receiver) = WorkerGroup::new();

        let mut aligned = aligned.into_iter();
        for wave in 0..waves {
            for item in aligned.by_ref().take(iteration_step) {
                workers.spawn(self.requester.clone(), item);
            }
            debug!("Launched wave {}/{} of {} requests", wave + 1, waves, iteration_step);

            self.wave_sleeper.sleep(self.config.batch_pause).await;
        }

        for item in unaligned {
            workers.spawn(self.requester.clone(), item);
        }
        if tail > 0 {
            debug!("Launched unaligned tail of {} requests", tail);
        }
        debug_assert_eq!(workers.launched(), total);

        let (lost, (results, mut failures)) = tokio::join!(workers.wait(), drain(receiver));
        failures.extend(lost);

        let summary = BatchSummary {
            total,
            succeeded: results.len(),
            failed: failures.len(),
            waves,
            tail,
            total_duration: started.elapsed(),
        };
        info!(
            "Batch finished: {}/{} succeeded in {:?}",
            summary.succeeded, summary.total, summary.total_duration
        );

        BatchReport {
            results,
            failures,
            summary,
        }
    }
}

async fn drain<T>(
    mut receiver: mpsc::UnboundedReceiver<Outcome<T>>,
) -> (Vec<SyncedResult<T>>, Vec<FailedRequest>) {
    let mut results = Vec::new();
    let mut failures = Vec::new();
    while let Some(outcome) = receiver.recv().await {
        match outcome {
            Ok(result) => results.push(result),
            Err(failure) => failures.push(failure),
        }
    }
    (results, failures)
}
