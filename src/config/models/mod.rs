//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod analysis;
pub mod gateway;
pub mod logging;
pub mod provider;
pub mod rate_limit;
pub mod server;

// Re-export all configuration types
pub use analysis::*;
pub use gateway::*;
pub use logging::*;
pub use provider::*;
pub use rate_limit::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

pub fn default_requests_per_minute() -> u32 {
    3
}

pub fn default_tokens_per_minute() -> u32 {
    15_000
}

pub fn default_requests_per_day() -> u32 {
    12_000
}

pub fn default_max_concurrent_requests() -> usize {
    2
}

pub fn default_max_queue_size() -> usize {
    50
}

pub fn default_scheduler_tick_ms() -> u64 {
    1000
}

pub fn default_sweep_interval_secs() -> u64 {
    3600
}

pub fn default_ledger_max_age_secs() -> u64 {
    24 * 60 * 60
}

/// Five minutes
pub fn default_max_wait_ms() -> u64 {
    5 * 60 * 1000
}

pub fn default_caller_daily_share() -> u32 {
    10
}

pub fn default_quick_estimated_tokens() -> u32 {
    2_000
}

pub fn default_comprehensive_estimated_tokens() -> u32 {
    8_000
}

pub fn default_quick_max_wait_ms() -> u64 {
    60 * 1000
}

pub fn default_comprehensive_max_wait_ms() -> u64 {
    default_max_wait_ms()
}

pub fn default_fallback_confidence_boost() -> f64 {
    0.2
}

pub fn default_provider_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_provider_model() -> String {
    "gpt-4o-mini".to_string()
}

pub fn default_provider_timeout_secs() -> u64 {
    120
}

pub fn default_quick_max_tokens() -> u32 {
    800
}

pub fn default_comprehensive_max_tokens() -> u32 {
    4_000
}

pub fn default_log_level() -> String {
    "info".to_string()
}
