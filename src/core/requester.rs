//! Single-request execution with retry, backoff and decoding

use crate::config::BatchClientConfig;
use crate::decode::Decoder;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::utils::error::{FanoutError, Result};
use crate::utils::sleeper::Sleeper;
use rand::Rng;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Executes one request against the transport.
///
/// Rate-limited responses (429) are retried after `backoff + jitter`, other
/// non-success responses are retried immediately, and transport failures end
/// the request at once. When the attempt budget runs out the last response is
/// decoded regardless of its status.
pub struct RetryingRequester<T> {
    config: Arc<BatchClientConfig>,
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn Decoder<T>>,
    sleeper: Arc<dyn Sleeper>,
}

impl<T> Clone for RetryingRequester<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            decoder: Arc::clone(&self.decoder),
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<T> RetryingRequester<T> {
    /// Create a requester sharing the client's configuration
    pub fn new(
        config: Arc<BatchClientConfig>,
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn Decoder<T>>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config,
            transport,
            decoder,
            sleeper,
        }
    }

    pub(crate) fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Run the request through the retry loop and decode the final response
    pub async fn execute(&self, request: &HttpRequest) -> Result<T> {
        let mut attempts_left = self.config.request_attempts;
        let mut attempts = 0u32;
        let mut last_response: Option<HttpResponse> = None;

        while attempts_left > 0 {
            attempts += 1;

            let response = self.transport.exchange(request).await.inspect_err(|e| {
                self.config
                    .logger
                    .log_error(e, &format!("Web request to {} failed", request.url));
            })?;

            let status = response.status();
            if status.is_success() {
                last_response = Some(response);
                break;
            }

            attempts_left -= 1;
            if status == StatusCode::TOO_MANY_REQUESTS {
                self.config.logger.log_warn(&format!(
                    "Web request ends with a status code {}",
                    status.as_u16()
                ));
                if attempts_left > 0 {
                    let delay = self.retry_delay(attempts_left);
                    debug!(
                        "Rate limited by {}, retrying in {:?} ({} attempts left)",
                        request.url, delay, attempts_left
                    );
                    self.sleeper.sleep(delay).await;
                }
            } else {
                debug!(
                    "{} answered {}, {} attempts left",
                    request.url, status, attempts_left
                );
            }

            last_response = Some(response);
        }

        debug!("{} finished after {} attempt(s)", request.url, attempts);

        // Only reachable without a response when the budget was zero, which
        // validation rules out.
        let response = last_response.ok_or_else(|| {
            FanoutError::config("the number of request attempts must be at least 1")
        })?;

        self.decode_response(response).await
    }

    /// Base backoff for `attempts_left` plus random jitter
    pub fn retry_delay(&self, attempts_left: u32) -> Duration {
        self.config.backoff_for(attempts_left) + jitter(self.config.jitter_interval)
    }

    async fn decode_response(&self, response: HttpResponse) -> Result<T> {
        let body = response.read_body().await.inspect_err(|e| {
            self.config.logger.log_error(e, &e.to_string());
        })?;

        self.decoder.decode(&body).inspect_err(|e| {
            self.config.logger.log_error(e, &e.to_string());
        })
    }
}

/// Uniform random delay in `[0, bound)` at millisecond granularity
pub fn jitter(bound: Duration) -> Duration {
    let bound_ms = bound.as_millis() as u64;
    if bound_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..bound_ms))
}
