//! Status reporting and operator controls

use super::admission::Now;
use super::limiter::RateLimitManager;
use super::types::{RateLimitStatus, WindowUsage};
use crate::config::models::rate_limit::{RateLimitConfig, RateLimitOverride};
use crate::config::validation::Validate;
use crate::utils::error::{GatewayError, Result};
use tracing::{info, warn};

impl RateLimitManager {
    /// Snapshot of every ceiling plus queue state
    pub fn status(&self) -> RateLimitStatus {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = Now::read();
        state.discard_abandoned();

        let window = state.admission.window.current_status_at(now.instant);
        let today = state.admission.ledger.total_requests_today(now.wall);
        let active = state.admission.active();
        let queue_length = state.queue.len();
        let config = &state.config;

        RateLimitStatus {
            requests_per_minute: WindowUsage::new(
                window.requests_used,
                u64::from(config.requests_per_minute),
            ),
            tokens_per_minute: WindowUsage::new(
                window.tokens_used,
                u64::from(config.tokens_per_minute),
            ),
            requests_per_day: WindowUsage::new(today, u64::from(config.requests_per_day)),
            concurrent_requests: WindowUsage::new(
                active as u64,
                config.max_concurrent_requests as u64,
            ),
            queue_length,
            max_queue_size: state.effective_max_queue_size(),
            active_requests: active,
            estimated_wait_ms: estimate_wait_ms(queue_length, active, config),
            circuit_breaker_engaged: state.circuit_breaker,
        }
    }

    /// 1-based position of the caller's earliest queued request
    pub fn queue_position(&self, caller_id: &str) -> Option<usize> {
        let mut state = self.state.lock();
        state.discard_abandoned();
        state.queue.position_of(caller_id)
    }

    /// Copy of the ceilings currently in force
    pub fn config(&self) -> RateLimitConfig {
        self.state.lock().config.clone()
    }

    /// Replace a subset of the ceilings at runtime.
    ///
    /// Requests already admitted or queued are unaffected; new decisions use
    /// the new values.
    pub fn apply_override(&self, update: &RateLimitOverride) -> Result<RateLimitConfig> {
        if update.is_empty() {
            return Err(GatewayError::validation("Override names no ceilings"));
        }

        let mut state = self.state.lock();
        let candidate = state.config.clone().apply(update);
        candidate.validate().map_err(GatewayError::Validation)?;

        info!(
            requests_per_minute = candidate.requests_per_minute,
            tokens_per_minute = candidate.tokens_per_minute,
            requests_per_day = candidate.requests_per_day,
            max_concurrent_requests = candidate.max_concurrent_requests,
            max_queue_size = candidate.max_queue_size,
            "Rate limit override applied"
        );
        state.config = candidate.clone();
        Ok(candidate)
    }

    /// While engaged the effective queue size is zero
    pub fn set_circuit_breaker(&self, engaged: bool) {
        let mut state = self.state.lock();
        if state.circuit_breaker == engaged {
            return;
        }
        state.circuit_breaker = engaged;
        if engaged {
            warn!(queued = state.queue.len(), "Circuit breaker engaged, new requests will not queue");
        } else {
            info!("Circuit breaker released");
        }
    }

    pub fn circuit_breaker_engaged(&self) -> bool {
        self.state.lock().circuit_breaker
    }
}

/// Milliseconds until the queue drains at the sustainable rate.
///
/// Throughput is `requests_per_minute / 60` per second, halved while every
/// concurrency slot is busy. The estimate is rounded up to whole seconds.
pub(super) fn estimate_wait_ms(queue_length: usize, active: usize, config: &RateLimitConfig) -> u64 {
    if queue_length == 0 {
        return 0;
    }

    let per_second = f64::from(config.requests_per_minute) / 60.0;
    let throughput = if active >= config.max_concurrent_requests {
        per_second / 2.0
    } else {
        per_second
    };

    ((queue_length as f64 / throughput.max(f64::EPSILON)).ceil() * 1000.0) as u64
}
