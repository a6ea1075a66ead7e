//! Batch engine
//!
//! - **partition**: splits a batch into width-aligned waves and a tail
//! - **requester**: executes one request with retry, backoff and decoding
//! - **dispatcher**: fans a batch out over worker tasks and gathers results
//! - **types**: request/result items and the batch report

pub mod dispatcher;
pub mod partition;
pub mod requester;
pub mod types;
mod workers;


pub use dispatcher::BatchClient;
pub use partition::{align_slice, align_vec};
pub use requester::RetryingRequester;
pub use types::{BatchReport, BatchSummary, FailedRequest, SyncedRequest, SyncedResult};
