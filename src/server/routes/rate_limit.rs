//! Scheduler status and operator controls
//!
//! Read-only status endpoints for clients deciding when to submit, plus the
//! admin endpoints used to retune ceilings or shed load at runtime.

use crate::config::RateLimitOverride;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configure scheduler routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/rate-limit")
            .route("/status", web::get().to(get_status))
            .route("/queue/{caller_id}", web::get().to(get_queue_position)),
    )
    .service(
        web::scope("/api/v1/admin/rate-limit")
            .route("", web::put().to(update_limits))
            .route("/circuit-breaker", web::post().to(set_circuit_breaker)),
    );
}

/// Queue position response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuePositionResponse {
    pub caller_id: String,
    /// 1-based position, -1 when the caller has nothing queued
    pub position: i64,
    pub queued: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerRequest {
    pub engaged: bool,
}

/// GET /api/v1/rate-limit/status
async fn get_status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(state.scheduler.status()))
}

/// GET /api/v1/rate-limit/queue/{caller_id}
async fn get_queue_position(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let caller_id = path.into_inner();
    let position = state.scheduler.queue_position(&caller_id);

    HttpResponse::Ok().json(ApiResponse::success(QueuePositionResponse {
        caller_id,
        position: position.map_or(-1, |p| p as i64),
        queued: position.is_some(),
    }))
}

/// PUT /api/v1/admin/rate-limit
async fn update_limits(
    state: web::Data<AppState>,
    payload: web::Json<RateLimitOverride>,
) -> Result<HttpResponse> {
    info!("Rate limit override requested: {:?}", payload);

    let config = state.scheduler.apply_override(&payload)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(config)))
}

/// POST /api/v1/admin/rate-limit/circuit-breaker
async fn set_circuit_breaker(
    state: web::Data<AppState>,
    payload: web::Json<CircuitBreakerRequest>,
) -> HttpResponse {
    state.scheduler.set_circuit_breaker(payload.engaged);
    HttpResponse::Ok().json(ApiResponse::success(state.scheduler.status()))
}
