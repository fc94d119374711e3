//! Rate limiter types and data structures

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Queue priority class; lower rank dispatches first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    /// The user is actively waiting
    High,
    #[default]
    Medium,
    /// Background work
    Low,
}

impl RequestPriority {
    /// Numeric urgency: high=0, medium=1, low=2
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl std::fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Options accepted by `RateLimitManager::submit`
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOptions {
    pub priority: RequestPriority,
    /// Caller-supplied token estimate; never measured
    pub estimated_tokens: u32,
    /// Maximum time spent queued; `None` uses the configured default
    pub max_wait: Option<Duration>,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            priority: RequestPriority::Medium,
            estimated_tokens: 1,
            max_wait: None,
        }
    }
}

impl SubmitOptions {
    pub fn new(priority: RequestPriority, estimated_tokens: u32) -> Self {
        Self {
            priority,
            estimated_tokens,
            max_wait: None,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}

/// The four independent ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ceiling {
    Concurrency,
    RequestsPerMinute,
    TokensPerMinute,
    RequestsPerDay,
}

/// Usage against one ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowUsage {
    pub used: u64,
    pub limit: u64,
    pub remaining: u64,
}

impl WindowUsage {
    pub fn new(used: u64, limit: u64) -> Self {
        Self {
            used,
            limit,
            remaining: limit.saturating_sub(used),
        }
    }
}

/// Snapshot returned by `RateLimitManager::status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub requests_per_minute: WindowUsage,
    pub tokens_per_minute: WindowUsage,
    pub requests_per_day: WindowUsage,
    pub concurrent_requests: WindowUsage,
    pub queue_length: usize,
    pub max_queue_size: usize,
    pub active_requests: usize,
    pub estimated_wait_ms: u64,
    pub circuit_breaker_engaged: bool,
}
