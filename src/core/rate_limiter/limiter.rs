//! Scheduler facade: admission, queueing and execution of units of work

use super::admission::{AdmissionController, Now};
use super::job::{Job, Pending, execute};
use super::queue::{PriorityQueue, QueuedRequest};
use super::types::SubmitOptions;
use crate::config::models::rate_limit::RateLimitConfig;
use crate::utils::error::{GatewayError, Result};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Everything guarded by the scheduler lock
#[derive(Debug)]
pub(super) struct SchedulerState {
    pub(super) config: RateLimitConfig,
    pub(super) admission: AdmissionController,
    pub(super) queue: PriorityQueue<Pending>,
    pub(super) circuit_breaker: bool,
}

impl SchedulerState {
    pub(super) fn effective_max_queue_size(&self) -> usize {
        if self.circuit_breaker {
            0
        } else {
            self.config.max_queue_size
        }
    }

    /// Drop queued entries whose submitter stopped waiting
    pub(super) fn discard_abandoned(&mut self) -> usize {
        let abandoned = self.queue.remove_where(|queued| queued.job.work.is_abandoned());
        let count = abandoned.len();
        for mut request in abandoned {
            request.job.cancel_timeout();
            debug!(request_id = %request.id, caller_id = %request.caller_id, "Discarding abandoned request");
        }
        count
    }
}

/// Rate-limited request scheduler.
///
/// Cloning is cheap and every clone drives the same state. The lock is never
/// held across an await point.
#[derive(Debug, Clone)]
pub struct RateLimitManager {
    pub(super) state: Arc<Mutex<SchedulerState>>,
}

enum Ticket<Fut, T> {
    Admitted(Fut),
    Queued(oneshot::Receiver<Result<T>>),
}

/// Returns the concurrency slot when dropped, including on panic or cancellation
pub(super) struct SlotGuard {
    state: Arc<Mutex<SchedulerState>>,
}

impl SlotGuard {
    pub(super) fn new(state: Arc<Mutex<SchedulerState>>) -> Self {
        Self { state }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.state.lock().admission.release();
    }
}

impl RateLimitManager {
    /// Create a scheduler; call `start` to run its background loops
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SchedulerState {
                config,
                admission: AdmissionController::new(),
                queue: PriorityQueue::new(),
                circuit_breaker: false,
            })),
        }
    }

    /// Run `work` as soon as every ceiling allows it.
    ///
    /// The work is started immediately when capacity exists, otherwise it waits
    /// in the priority queue for up to `options.max_wait`. Rejections:
    /// `DailyLimitExceeded` when the caller's share of the daily budget is used
    /// up, `Overloaded` when the queue is full, `RequestTimeout` when the wait
    /// expires. Errors from `work` itself are returned unchanged.
    pub async fn submit<Fut, T>(&self, caller_id: &str, work: Fut, options: SubmitOptions) -> Result<T>
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let estimated_tokens = options.estimated_tokens.max(1);

        let ticket = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let now = Now::read();

            let cap = state.config.caller_daily_cap();
            if state
                .admission
                .ledger
                .has_exceeded_daily_cap_at(caller_id, cap, now.wall)
            {
                warn!(caller_id, limit = cap, "Caller reached daily request cap");
                return Err(GatewayError::DailyLimitExceeded {
                    caller_id: caller_id.to_string(),
                    limit: cap,
                });
            }

            if state
                .admission
                .try_admit(&state.config, caller_id, estimated_tokens, now)
            {
                Ticket::Admitted(work)
            } else {
                state.discard_abandoned();
                let max_queue_size = state.effective_max_queue_size();
                let max_wait = options
                    .max_wait
                    .unwrap_or_else(|| state.config.default_max_wait());
                let (reply, receiver) = oneshot::channel();
                let request = QueuedRequest::new(
                    caller_id,
                    options.priority,
                    estimated_tokens,
                    max_wait,
                    Pending::new(Box::new(Job::new(work, reply))),
                );
                let id = request.id;

                if let Err(full) = state.queue.enqueue(request, max_queue_size) {
                    warn!(
                        caller_id,
                        queue_length = full.queue_length,
                        max_queue_size = full.max_queue_size,
                        "Rejecting request, queue is full"
                    );
                    return Err(GatewayError::Overloaded {
                        queue_length: full.queue_length,
                        max_queue_size: full.max_queue_size,
                    });
                }

                let timer = self.arm_timeout(id, max_wait);
                if let Some(queued) = state.queue.get_mut(id) {
                    queued.job.timeout = Some(timer);
                }

                debug!(
                    request_id = %id,
                    caller_id,
                    priority = %options.priority,
                    estimated_tokens,
                    queue_length = state.queue.len(),
                    "Request queued"
                );
                Ticket::Queued(receiver)
            }
        };

        match ticket {
            Ticket::Admitted(work) => {
                debug!(caller_id, estimated_tokens, "Request admitted immediately");
                let _slot = SlotGuard::new(self.state.clone());
                execute(work).await
            }
            Ticket::Queued(receiver) => match receiver.await {
                Ok(outcome) => outcome,
                Err(_) => Err(GatewayError::shutdown(
                    "Request was dropped before it could be resolved",
                )),
            },
        }
    }

    /// Expire a queued request after `max_wait` unless it has been dispatched
    fn arm_timeout(&self, id: Uuid, max_wait: Duration) -> AbortHandle {
        let state = Arc::downgrade(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(max_wait).await;
            let Some(state) = state.upgrade() else {
                return;
            };

            let expired = state.lock().queue.remove_by_id(id);
            if let Some(request) = expired {
                let waited_ms = request.waited().as_millis() as u64;
                warn!(
                    request_id = %id,
                    caller_id = %request.caller_id,
                    waited_ms,
                    "Queued request timed out"
                );
                request
                    .job
                    .work
                    .reject(GatewayError::RequestTimeout { waited_ms });
            }
        })
        .abort_handle()
    }
}
