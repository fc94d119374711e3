//! Scheduler and analysis validators

use super::trait_def::Validate;
use crate::config::models::*;

/// Ledger entries must outlive the day their counts belong to
const MIN_LEDGER_MAX_AGE_SECS: u64 = 24 * 60 * 60;

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.requests_per_minute == 0 {
            return Err("Requests per minute must be greater than 0".to_string());
        }

        if self.tokens_per_minute == 0 {
            return Err("Tokens per minute must be greater than 0".to_string());
        }

        if self.requests_per_day == 0 {
            return Err("Requests per day must be greater than 0".to_string());
        }

        if self.max_concurrent_requests == 0 {
            return Err("Max concurrent requests must be greater than 0".to_string());
        }

        // max_queue_size == 0 is the circuit breaker setting and is allowed

        if self.scheduler_tick_ms == 0 {
            return Err("Scheduler tick must be greater than 0".to_string());
        }

        if self.sweep_interval_secs == 0 {
            return Err("Ledger sweep interval must be greater than 0".to_string());
        }

        if self.ledger_max_age_secs < MIN_LEDGER_MAX_AGE_SECS {
            return Err(format!(
                "Ledger max age must be at least {} seconds",
                MIN_LEDGER_MAX_AGE_SECS
            ));
        }

        if self.default_max_wait_ms == 0 {
            return Err("Default max wait must be greater than 0".to_string());
        }

        if self.caller_daily_share == 0 {
            return Err("Caller daily share must be greater than 0".to_string());
        }

        if self.caller_daily_cap() == 0 {
            return Err(format!(
                "Requests per day ({}) is too small for a caller share of 1/{}",
                self.requests_per_day, self.caller_daily_share
            ));
        }

        Ok(())
    }
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> Result<(), String> {
        if self.quick_estimated_tokens == 0 {
            return Err("Quick scan token estimate must be greater than 0".to_string());
        }

        if self.comprehensive_estimated_tokens < self.quick_estimated_tokens {
            return Err(
                "Comprehensive token estimate must not be smaller than the quick scan estimate"
                    .to_string(),
            );
        }

        if !(0.0..=1.0).contains(&self.fallback_confidence_boost) {
            return Err("Fallback confidence boost must be between 0 and 1".to_string());
        }

        if self.quick_max_wait_ms == 0 || self.comprehensive_max_wait_ms == 0 {
            return Err("Analysis max wait times must be greater than 0".to_string());
        }

        Ok(())
    }
}
