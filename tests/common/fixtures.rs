//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.

use review_gateway::DocumentRef;
use review_gateway::config::{AnalysisConfig, RateLimitConfig};
use uuid::Uuid;

/// Factory for scheduler configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Defaults with a fast tick so queued work moves in test time
    pub fn fast_tick() -> RateLimitConfig {
        RateLimitConfig {
            scheduler_tick_ms: 10,
            ..RateLimitConfig::default()
        }
    }

    /// One unit of work at a time and a small queue
    pub fn tight() -> RateLimitConfig {
        RateLimitConfig {
            max_concurrent_requests: 1,
            max_queue_size: 3,
            ..Self::fast_tick()
        }
    }

    /// Room for many requests per minute
    pub fn roomy() -> RateLimitConfig {
        RateLimitConfig {
            requests_per_minute: 1_000,
            tokens_per_minute: 1_000_000,
            max_concurrent_requests: 4,
            ..Self::fast_tick()
        }
    }

    /// Analysis settings with short waits
    pub fn analysis() -> AnalysisConfig {
        AnalysisConfig {
            quick_max_wait_ms: 500,
            comprehensive_max_wait_ms: 500,
            ..AnalysisConfig::default()
        }
    }
}

/// Factory for test documents
pub struct DocumentFactory;

impl DocumentFactory {
    /// A short policy document
    pub fn create() -> DocumentRef {
        let id = Uuid::new_v4().to_string();
        DocumentRef::new(
            id,
            "policy.txt",
            "Access to production systems is reviewed quarterly by the security team.",
        )
    }

    /// A document of roughly `chars` characters
    pub fn with_length(chars: usize) -> DocumentRef {
        let mut doc = Self::create();
        doc.content = "word ".repeat(chars / 5);
        doc
    }

    /// Several short documents
    pub fn batch(count: usize) -> Vec<DocumentRef> {
        (0..count).map(|_| Self::create()).collect()
    }
}
