//! Worker group: one task per request, a join barrier and a result channel

use super::requester::RetryingRequester;
use super::types::{FailedRequest, SyncedRequest, SyncedResult};
use crate::utils::error::FanoutError;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error};

pub(crate) type Outcome<T> = std::result::Result<SyncedResult<T>, FailedRequest>;

/// Tasks launched for one batch.
///
/// Every task owns a clone of the sender, so the receiving side sees the
/// channel close only once [`WorkerGroup::wait`] has released the group's own
/// sender and every task has finished.
pub(crate) struct WorkerGroup<T> {
    tasks: JoinSet<()>,
    sender: mpsc::UnboundedSender<Outcome<T>>,
    launched: usize,
}

impl<T: Send + 'static> WorkerGroup<T> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outcome<T>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let group = Self {
            tasks: JoinSet::new(),
            sender,
            launched: 0,
        };
        (group, receiver)
    }

    pub fn launched(&self) -> usize {
        self.launched
    }

    pub fn spawn(&mut self, requester: RetryingRequester<T>, item: SyncedRequest) {
        let sender = self.sender.clone();
        self.launched += 1;

        self.tasks.spawn(async move {
            let SyncedRequest { request, sync_key } = item;

            let outcome = match AssertUnwindSafe(requester.execute(&request))
                .catch_unwind()
                .await
            {
                Ok(Ok(result)) => Ok(SyncedResult { result, sync_key }),
                Ok(Err(error)) => Err(FailedRequest { sync_key, error }),
                Err(_) => {
                    error!("Worker for {} panicked", request.url);
                    Err(FailedRequest {
                        sync_key,
                        error: FanoutError::Join("worker task panicked".to_string()),
                    })
                }
            };

            if sender.send(outcome).is_err() {
                debug!("Result for {} dropped: receiver closed", request.url);
            }
        });
    }

    /// Wait for every launched task. Returns failures for tasks that ended
    /// without reporting (cancelled), which carry no sync key.
    pub async fn wait(self) -> Vec<FailedRequest> {
        let Self {
            mut tasks, sender, ..
        } = self;
        drop(sender);

        let mut lost = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            if let Err(join_error) = joined {
                error!("Worker task did not complete: {}", join_error);
                lost.push(FailedRequest {
                    sync_key: None,
                    error: join_error.into(),
                });
            }
        }
        lost
    }
}
