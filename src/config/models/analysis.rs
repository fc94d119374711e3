//! Progressive analysis configuration

use super::*;
use crate::core::rate_limiter::RequestPriority;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the two-phase analysis workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Token estimate floor for the quick scan
    #[serde(default = "default_quick_estimated_tokens")]
    pub quick_estimated_tokens: u32,
    /// Token estimate floor for the comprehensive pass
    #[serde(default = "default_comprehensive_estimated_tokens")]
    pub comprehensive_estimated_tokens: u32,
    /// Maximum queue wait for the quick scan
    #[serde(default = "default_quick_max_wait_ms")]
    pub quick_max_wait_ms: u64,
    /// Maximum queue wait for the comprehensive pass
    #[serde(default = "default_comprehensive_max_wait_ms")]
    pub comprehensive_max_wait_ms: u64,
    /// Confidence added to the partial result when the comprehensive pass fails
    #[serde(default = "default_fallback_confidence_boost")]
    pub fallback_confidence_boost: f64,
    /// Queue priority of the comprehensive pass
    #[serde(default = "default_comprehensive_priority")]
    pub comprehensive_priority: RequestPriority,
}

fn default_comprehensive_priority() -> RequestPriority {
    RequestPriority::Medium
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            quick_estimated_tokens: default_quick_estimated_tokens(),
            comprehensive_estimated_tokens: default_comprehensive_estimated_tokens(),
            quick_max_wait_ms: default_quick_max_wait_ms(),
            comprehensive_max_wait_ms: default_comprehensive_max_wait_ms(),
            fallback_confidence_boost: default_fallback_confidence_boost(),
            comprehensive_priority: default_comprehensive_priority(),
        }
    }
}

impl AnalysisConfig {
    pub fn quick_max_wait(&self) -> Duration {
        Duration::from_millis(self.quick_max_wait_ms)
    }

    pub fn comprehensive_max_wait(&self) -> Duration {
        Duration::from_millis(self.comprehensive_max_wait_ms)
    }
}
