//! Health check and version endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/version", web::get().to(version_info));
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    pub uptime_seconds: i64,
    /// Engaged breaker means new work is being shed
    pub circuit_breaker_engaged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: Cow<'static, str>,
    pub build_time: Cow<'static, str>,
    pub git_hash: Cow<'static, str>,
    pub rust_version: Cow<'static, str>,
    pub provider: String,
}

/// Liveness; reports `degraded` while the circuit breaker is engaged
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let circuit_breaker_engaged = state.scheduler.circuit_breaker_engaged();
    let health_status = HealthStatus {
        status: if circuit_breaker_engaged {
            Cow::Borrowed("degraded")
        } else {
            Cow::Borrowed("healthy")
        },
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime_seconds: state.uptime_seconds(),
        circuit_breaker_engaged,
    };

    HttpResponse::Ok().json(ApiResponse::success(health_status))
}

async fn version_info(state: web::Data<AppState>) -> HttpResponse {
    debug!("Version info requested");

    let build = crate::build_info();
    let version_info = VersionInfo {
        version: Cow::Borrowed(build.version),
        build_time: Cow::Borrowed(build.build_time),
        git_hash: Cow::Borrowed(build.git_hash),
        rust_version: Cow::Borrowed(build.rust_version),
        provider: state.analyzer.provider_name().to_string(),
    };

    HttpResponse::Ok().json(ApiResponse::success(version_info))
}
