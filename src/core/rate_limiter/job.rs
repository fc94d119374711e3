//! Type-erased units of work parked in the queue

use crate::utils::error::{GatewayError, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

/// A queued unit of work whose result type has been erased.
///
/// Every method consumes the job, so it is resolved at most once.
pub(super) trait PendingJob: Send {
    fn run(self: Box<Self>) -> BoxFuture<'static, ()>;
    fn reject(self: Box<Self>, error: GatewayError);
    /// The submitter stopped waiting for the result
    fn is_abandoned(&self) -> bool;
}

pub(super) struct Job<Fut, T> {
    work: Fut,
    reply: oneshot::Sender<Result<T>>,
}

impl<Fut, T> Job<Fut, T> {
    pub(super) fn new(work: Fut, reply: oneshot::Sender<Result<T>>) -> Self {
        Self { work, reply }
    }
}

impl<Fut, T> PendingJob for Job<Fut, T>
where
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    fn run(self: Box<Self>) -> BoxFuture<'static, ()> {
        let Job { work, reply } = *self;
        async move {
            let outcome = execute(work).await;
            let _ = reply.send(outcome);
        }
        .boxed()
    }

    fn reject(self: Box<Self>, error: GatewayError) {
        let _ = self.reply.send(Err(error));
    }

    fn is_abandoned(&self) -> bool {
        self.reply.is_closed()
    }
}

/// Await a unit of work, turning a panic into an error
pub(super) async fn execute<Fut, T>(work: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => Err(GatewayError::unit_of_work("unit of work panicked")),
    }
}

/// Queue payload: the job plus the timer that expires it
pub(super) struct Pending {
    pub(super) work: Box<dyn PendingJob>,
    pub(super) timeout: Option<AbortHandle>,
}

impl Pending {
    pub(super) fn new(work: Box<dyn PendingJob>) -> Self {
        Self {
            work,
            timeout: None,
        }
    }

    pub(super) fn cancel_timeout(&mut self) {
        if let Some(timeout) = self.timeout.take() {
            timeout.abort();
        }
    }
}

impl std::fmt::Debug for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending")
            .field("abandoned", &self.work.is_abandoned())
            .field("timer_armed", &self.timeout.is_some())
            .finish()
    }
}
