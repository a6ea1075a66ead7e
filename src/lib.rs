//! # fanout-http
//!
//! Concurrent HTTP batch requests with a fixed fan-out width, jittered retry
//! backoff and keyed result correlation.
//!
//! A batch is split into waves of `iteration_step` requests. Each wave is
//! launched at once and followed by a short pause before the next one; any
//! remainder that does not fill a wave is launched together at the end.
//! Every request is retried on `429 Too Many Requests` (after backoff plus
//! jitter) and on other non-success statuses (immediately), up to the
//! configured attempt budget. Results come back in completion order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fanout_http::{BatchClient, BatchClientConfig, HttpRequest, ReqwestTransport, SyncedRequest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(ReqwestTransport::new(&Default::default())?);
//!     let client: BatchClient<serde_json::Value> =
//!         BatchClient::new(BatchClientConfig::default().with_iteration_step(4), transport)?;
//!
//!     let mut items = Vec::new();
//!     for id in 1..=10 {
//!         let url = format!("https://api.example.com/artists/{}", id);
//!         items.push(SyncedRequest::with_key(HttpRequest::get(&url)?, id.to_string()));
//!     }
//!
//!     for synced in client.dispatch_with_keys(items).await {
//!         println!("{:?}: {}", synced.sync_key, synced.result);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod decode;
pub mod transport;
pub mod utils;

// Re-export main types
pub use config::{BatchClientConfig, BatchSettings, Validate};
pub use core::{
    BatchClient, BatchReport, BatchSummary, FailedRequest, RetryingRequester, SyncedRequest,
    SyncedResult, align_slice, align_vec,
};
pub use decode::{Decoder, JsonDecoder};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportConfig};
pub use utils::error::{FanoutError, Result};
pub use utils::logging::{Logger, TracingLogger};
pub use utils::sleeper::{Sleeper, TokioSleeper};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
