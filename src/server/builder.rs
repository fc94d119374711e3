//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function for automatic configuration loading.

use crate::config::Config;
use crate::core::analysis::AnalysisProvider;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    provider: Option<Arc<dyn AnalysisProvider>>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use `provider` instead of the configured LLM endpoint
    pub fn with_provider(mut self, provider: Arc<dyn AnalysisProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        match self.provider {
            Some(provider) => Ok(HttpServer::with_provider(&config, provider)),
            None => HttpServer::new(&config),
        }
    }
}

/// Load `path`, falling back to environment variables when the file is missing.
///
/// A file that exists but fails to parse or validate is an error.
pub async fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Config::from_file(path).await;
    }

    warn!(
        "Configuration file {:?} not found, using defaults and environment variables",
        path
    );
    Config::from_env()
}

/// Run the server with an already-loaded configuration
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting {} v{}", crate::NAME, crate::VERSION);

    let server = ServerBuilder::new().with_config(config).build()?;
    info!(
        "Server starting at: http://{}",
        server.config().address()
    );
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /api/v1/rate-limit/status - Scheduler status");
    info!("   POST /api/v1/analysis - Progressive analysis (SSE)");
    info!("   POST /api/v1/analysis/sync - Progressive analysis (final result)");

    server.start().await
}
