//! Batch item types

use crate::transport::HttpRequest;
use crate::utils::error::FanoutError;
use serde::Serialize;
use std::time::Duration;

/// A request plus an optional caller-chosen key echoed back with its result
#[derive(Debug, Clone)]
pub struct SyncedRequest {
    pub request: HttpRequest,
    pub sync_key: Option<String>,
}

impl SyncedRequest {
    pub fn new(request: HttpRequest) -> Self {
        Self {
            request,
            sync_key: None,
        }
    }

    /// Request carrying a correlation key
    pub fn with_key(request: HttpRequest, sync_key: impl Into<String>) -> Self {
        Self {
            request,
            sync_key: Some(sync_key.into()),
        }
    }
}

impl From<HttpRequest> for SyncedRequest {
    fn from(request: HttpRequest) -> Self {
        Self::new(request)
    }
}

/// Decoded payload of a successful request and the key it was sent with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncedResult<T> {
    pub result: T,
    pub sync_key: Option<String>,
}

/// A request that produced no result
#[derive(Debug)]
pub struct FailedRequest {
    pub sync_key: Option<String>,
    pub error: FanoutError,
}

/// Summary of batch execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Requests in the input
    pub total: usize,
    /// Requests that produced a result
    pub succeeded: usize,
    /// Requests that produced no result
    pub failed: usize,
    /// Aligned waves launched (the tail is not counted)
    pub waves: usize,
    /// Requests launched as the unaligned tail
    pub tail: usize,
    /// Wall time from first launch to last result
    pub total_duration: Duration,
}

/// Everything a batch produced, in completion order
#[derive(Debug)]
pub struct BatchReport<T> {
    pub results: Vec<SyncedResult<T>>,
    pub failures: Vec<FailedRequest>,
    pub summary: BatchSummary,
}

impl<T> BatchReport<T> {
    /// The batch had requests and none of them succeeded
    pub fn is_total_failure(&self) -> bool {
        self.summary.total > 0 && self.results.is_empty()
    }

    pub fn is_empty_input(&self) -> bool {
        self.summary.total == 0
    }

    pub fn into_results(self) -> Vec<SyncedResult<T>> {
        self.results
    }
}
