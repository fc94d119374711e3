//! Scheduler loop, ledger sweep and lifecycle handle

use super::admission::Now;
use super::limiter::{RateLimitManager, SlotGuard};
use crate::utils::error::GatewayError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

impl RateLimitManager {
    /// Start the scheduler tick and the ledger sweep
    pub fn start(&self) -> SchedulerHandle {
        let (tick, sweep) = {
            let state = self.state.lock();
            (state.config.tick_interval(), state.config.sweep_interval())
        };

        let manager = self.clone();
        let tick_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                manager.process_queue();
            }
        });

        let manager = self.clone();
        let sweep_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                manager.sweep_ledger();
            }
        });

        info!(
            tick_ms = tick.as_millis() as u64,
            sweep_secs = sweep.as_secs(),
            "Request scheduler started"
        );

        SchedulerHandle {
            manager: self.clone(),
            tasks: vec![tick_task, sweep_task],
        }
    }

    /// Dispatch queued requests from the head while the head is admittable.
    ///
    /// Entries whose submitter has gone away are discarded. Returns the number
    /// of requests dispatched.
    pub fn process_queue(&self) -> usize {
        let dispatched = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let now = Now::read();
            let mut dispatched = Vec::new();

            while let Some(head) = state.queue.peek_front() {
                if head.job.work.is_abandoned() {
                    if let Some(mut abandoned) = state.queue.pop_front() {
                        abandoned.job.cancel_timeout();
                        debug!(request_id = %abandoned.id, "Discarding abandoned request");
                    }
                    continue;
                }

                let estimated_tokens = head.estimated_tokens;
                if !state
                    .admission
                    .can_admit_now(&state.config, estimated_tokens, now)
                {
                    break;
                }

                let Some(mut request) = state.queue.pop_front() else {
                    break;
                };
                state
                    .admission
                    .commit(&request.caller_id, request.estimated_tokens, now);
                request.job.cancel_timeout();
                dispatched.push(request);
            }

            dispatched
        };

        let count = dispatched.len();
        for request in dispatched {
            debug!(
                request_id = %request.id,
                caller_id = %request.caller_id,
                priority = %request.priority,
                waited_ms = request.waited().as_millis() as u64,
                "Dispatching queued request"
            );
            let slot = SlotGuard::new(self.state.clone());
            let work = request.job.work;
            tokio::spawn(async move {
                let _slot = slot;
                work.run().await;
            });
        }

        count
    }

    /// Drop ledger entries idle for longer than the configured age
    pub fn sweep_ledger(&self) -> usize {
        let mut state = self.state.lock();
        let max_age = state.config.ledger_max_age();
        let removed = state.admission.ledger.sweep(max_age);
        if removed > 0 {
            debug!(removed, remaining = state.admission.ledger.len(), "Swept idle callers");
        }
        removed
    }

    /// Fail every queued request with `Shutdown`; returns how many were rejected
    pub fn reject_all_queued(&self) -> usize {
        let drained = self.state.lock().queue.drain_all();
        let count = drained.len();
        for mut request in drained {
            request.job.cancel_timeout();
            request
                .job
                .work
                .reject(GatewayError::shutdown("Scheduler is shutting down"));
        }
        count
    }
}

/// Owns the background loops; dropping it stops them
#[derive(Debug)]
pub struct SchedulerHandle {
    manager: RateLimitManager,
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    /// Stop the loops and fail anything still queued
    pub async fn shutdown(mut self) -> usize {
        for task in std::mem::take(&mut self.tasks) {
            task.abort();
            let _ = task.await;
        }

        let rejected = self.manager.reject_all_queued();
        info!(rejected, "Request scheduler stopped");
        rejected
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
