//! Admission control across the four ceilings

use super::ledger::UsageLedger;
use super::types::Ceiling;
use super::window::{GlobalWindow, WindowStatus};
use crate::config::models::rate_limit::RateLimitConfig;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Wall-clock and monotonic readings taken together
#[derive(Debug, Clone, Copy)]
pub struct Now {
    pub instant: Instant,
    pub wall: DateTime<Utc>,
}

impl Now {
    pub fn read() -> Self {
        Self {
            instant: Instant::now(),
            wall: Utc::now(),
        }
    }
}

/// Owns everything the admission decision reads and writes.
///
/// Callers must hold the scheduler lock for a check and its commit.
#[derive(Debug, Default)]
pub struct AdmissionController {
    pub(super) ledger: UsageLedger,
    pub(super) window: GlobalWindow,
    active: usize,
}

impl AdmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// First ceiling that would be breached, checked in a fixed order
    pub fn blocking_ceiling(
        &mut self,
        config: &RateLimitConfig,
        estimated_tokens: u32,
        now: Now,
    ) -> Option<Ceiling> {
        if self.active >= config.max_concurrent_requests {
            return Some(Ceiling::Concurrency);
        }

        let WindowStatus {
            requests_used,
            tokens_used,
        } = self.window.current_status_at(now.instant);

        if requests_used >= u64::from(config.requests_per_minute) {
            return Some(Ceiling::RequestsPerMinute);
        }

        let tokens_remaining = u64::from(config.tokens_per_minute).saturating_sub(tokens_used);
        if tokens_remaining < u64::from(estimated_tokens) {
            return Some(Ceiling::TokensPerMinute);
        }

        if self.ledger.total_requests_today(now.wall) >= u64::from(config.requests_per_day) {
            return Some(Ceiling::RequestsPerDay);
        }

        None
    }

    pub fn can_admit_now(&mut self, config: &RateLimitConfig, estimated_tokens: u32, now: Now) -> bool {
        self.blocking_ceiling(config, estimated_tokens, now).is_none()
    }

    /// Record the admission in the ledger and window and take a concurrency slot
    pub fn commit(&mut self, caller_id: &str, estimated_tokens: u32, now: Now) {
        self.ledger.record_usage_at(caller_id, estimated_tokens, now.wall);
        self.window.record_event_at(estimated_tokens, now.instant);
        self.active += 1;
    }

    /// Check and commit as one step
    pub fn try_admit(
        &mut self,
        config: &RateLimitConfig,
        caller_id: &str,
        estimated_tokens: u32,
        now: Now,
    ) -> bool {
        if self.can_admit_now(config, estimated_tokens, now) {
            self.commit(caller_id, estimated_tokens, now);
            true
        } else {
            false
        }
    }

    pub fn release(&mut self) {
        self.active = self.active.saturating_sub(1);
    }
}
