//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::analysis::{AnalysisProvider, ProgressiveAnalyzer};
use crate::core::rate_limiter::RateLimitManager;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// HTTP server state shared across handlers.
///
/// The scheduler is the single instance every request goes through; the
/// analyzer submits its phases to that same scheduler.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    pub scheduler: RateLimitManager,
    pub analyzer: Arc<ProgressiveAnalyzer>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the scheduler and analyzer around `provider`
    pub fn new(config: Config, provider: Arc<dyn AnalysisProvider>) -> Self {
        let scheduler = RateLimitManager::new(config.rate_limit().clone());
        let analyzer = ProgressiveAnalyzer::new(scheduler.clone(), provider, config.analysis().clone());

        Self {
            config: Arc::new(config),
            scheduler,
            analyzer: Arc::new(analyzer),
            started_at: Utc::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
