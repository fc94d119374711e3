//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, CorsConfig, ServerConfig};
use crate::core::analysis::{AnalysisProvider, LlmAnalysisProvider};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by the configured LLM endpoint
    pub fn new(config: &Config) -> Result<Self> {
        let provider = LlmAnalysisProvider::new(config.provider().clone())?;
        info!(
            provider = %config.provider().name,
            model = %config.provider().model,
            "Analysis provider configured"
        );
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Create a server around an already-built provider
    pub fn with_provider(config: &Config, provider: Arc<dyn AnalysisProvider>) -> Self {
        info!("Creating HTTP server");

        Self {
            config: config.server().clone(),
            state: AppState::new(config.clone(), provider),
        }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let cors = build_cors(&state.config().server().cors);

        App::new()
            .app_data(state)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", crate::NAME)))
            .configure(routes::configure_routes)
    }

    /// Start the scheduler and serve until the process is signalled.
    ///
    /// Requests still queued when the server stops are rejected with a
    /// shutdown error.
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();

        info!("Starting HTTP server on {}", bind_addr);

        let scheduler = self.state.scheduler.start();
        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| format_bind_error(e, &bind_addr))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        let outcome = server
            .await
            .map_err(|e| GatewayError::server(format!("Server error: {}", e)));

        let rejected = scheduler.shutdown().await;
        info!(rejected, "HTTP server stopped");
        outcome
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

fn build_cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }

    let mut cors = if config.allows_all_origins() {
        Cors::default().allow_any_origin()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    let methods: Vec<actix_web::http::Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    if !methods.is_empty() {
        cors = cors.allowed_methods(methods);
    }

    let headers: Vec<actix_web::http::header::HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();
    if !headers.is_empty() {
        cors = cors.allowed_headers(headers);
    }

    cors.max_age(config.max_age as usize)
}

fn format_bind_error(error: std::io::Error, bind_addr: &str) -> GatewayError {
    if error.kind() == std::io::ErrorKind::AddrInUse {
        GatewayError::server(format!(
            "Address {} is already in use; stop the other process or change server.port",
            bind_addr
        ))
    } else {
        GatewayError::server(format!("Failed to bind to {}: {}", bind_addr, error))
    }
}
