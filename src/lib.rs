//! # Review Gateway
//!
//! A rate-limited LLM request scheduler with a progressive document-analysis
//! workflow on top.
//!
//! ## Features
//!
//! - **Shared ceilings**: per-minute requests and tokens, per-day requests,
//!   concurrency and a per-caller daily cap, enforced in one place
//! - **Priority queue**: work that cannot run yet waits in priority/FIFO order
//!   with a per-request timeout
//! - **Progressive analysis**: a quick partial result first, then a
//!   comprehensive one, degrading to the partial result when the second
//!   phase fails
//! - **Operator controls**: runtime ceiling overrides and a circuit breaker
//!
//! ## Scheduling work
//!
//! ```rust,no_run
//! use review_gateway::config::RateLimitConfig;
//! use review_gateway::core::{RateLimitManager, RequestPriority, SubmitOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = RateLimitManager::new(RateLimitConfig::default());
//!     let handle = scheduler.start();
//!
//!     let answer = scheduler
//!         .submit(
//!             "user-1",
//!             async { Ok(42) },
//!             SubmitOptions::new(RequestPriority::High, 500),
//!         )
//!         .await?;
//!     assert_eq!(answer, 42);
//!
//!     handle.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use review_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config)?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

pub use crate::core::analysis::{
    AnalysisProvider, AnalysisResult, AnalysisUpdate, DocumentRef, LlmAnalysisProvider,
    ProgressiveAnalyzer, UserContext,
};
pub use crate::core::rate_limiter::{
    RateLimitManager, RateLimitStatus, RequestPriority, SchedulerHandle, SubmitOptions,
};

use tracing::info;

/// HTTP gateway wrapping the scheduler and analyzer
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::HttpServer::new(&config)?;

        Ok(Self { config, server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting {}", NAME);
        info!("Configuration: {:#?}", self.config);

        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (unix seconds)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build metadata captured by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
