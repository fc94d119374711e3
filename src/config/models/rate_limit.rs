//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ceilings and scheduler settings for the request scheduler
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Aggregate requests per rolling minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    /// Aggregate estimated tokens per rolling minute
    #[serde(default = "default_tokens_per_minute")]
    pub tokens_per_minute: u32,
    /// Aggregate requests per calendar day
    #[serde(default = "default_requests_per_day")]
    pub requests_per_day: u32,
    /// Units of work allowed in flight at once
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Pending requests held before new ones are rejected; 0 disables queueing
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
    /// Scheduler loop period in milliseconds
    #[serde(default = "default_scheduler_tick_ms")]
    pub scheduler_tick_ms: u64,
    /// How often idle caller entries are swept from the ledger
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Idle age after which a caller entry is swept
    #[serde(default = "default_ledger_max_age_secs")]
    pub ledger_max_age_secs: u64,
    /// Default maximum queue wait for a submission in milliseconds
    #[serde(default = "default_max_wait_ms")]
    pub default_max_wait_ms: u64,
    /// A single caller may use at most `requests_per_day / caller_daily_share` per day
    #[serde(default = "default_caller_daily_share")]
    pub caller_daily_share: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            tokens_per_minute: default_tokens_per_minute(),
            requests_per_day: default_requests_per_day(),
            max_concurrent_requests: default_max_concurrent_requests(),
            max_queue_size: default_max_queue_size(),
            scheduler_tick_ms: default_scheduler_tick_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
            ledger_max_age_secs: default_ledger_max_age_secs(),
            default_max_wait_ms: default_max_wait_ms(),
            caller_daily_share: default_caller_daily_share(),
        }
    }
}

impl RateLimitConfig {
    /// Replace the ceilings named in an operator override
    pub fn apply(mut self, over: &RateLimitOverride) -> Self {
        if let Some(v) = over.requests_per_minute {
            self.requests_per_minute = v;
        }
        if let Some(v) = over.tokens_per_minute {
            self.tokens_per_minute = v;
        }
        if let Some(v) = over.requests_per_day {
            self.requests_per_day = v;
        }
        if let Some(v) = over.max_concurrent_requests {
            self.max_concurrent_requests = v;
        }
        if let Some(v) = over.max_queue_size {
            self.max_queue_size = v;
        }
        self
    }

    /// Per-caller daily request cap
    pub fn caller_daily_cap(&self) -> u32 {
        self.requests_per_day / self.caller_daily_share.max(1)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.scheduler_tick_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn ledger_max_age(&self) -> Duration {
        Duration::from_secs(self.ledger_max_age_secs)
    }

    pub fn default_max_wait(&self) -> Duration {
        Duration::from_millis(self.default_max_wait_ms)
    }
}

/// Runtime override of any subset of the ceilings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RateLimitOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_per_minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_requests: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queue_size: Option<usize>,
}

impl RateLimitOverride {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
