//! Progressive analysis endpoints

use crate::core::analysis::{DocumentRef, UserContext};
use crate::server::sse::{Event, create_sse_response};
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configure analysis routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/analysis")
            .route("", web::post().to(analyze_stream))
            .route("/sync", web::post().to(analyze_sync)),
    );
}

/// Analysis request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Identity the daily cap is charged to
    pub caller_id: String,
    pub documents: Vec<DocumentRef>,
    #[serde(default)]
    pub context: UserContext,
}

impl AnalyzeRequest {
    fn validate(&self) -> Result<()> {
        if self.caller_id.trim().is_empty() {
            return Err(GatewayError::validation("caller_id cannot be empty"));
        }
        if self.documents.is_empty() {
            return Err(GatewayError::validation("At least one document is required"));
        }
        Ok(())
    }
}

/// POST /api/v1/analysis
///
/// Streams a `partial` event once the quick scan lands and a `complete` event
/// with the final result. A failed quick scan produces a single `error` event.
/// Every stream ends with `data: [DONE]`.
async fn analyze_stream(
    state: web::Data<AppState>,
    payload: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse> {
    let request = payload.into_inner();
    request.validate()?;
    info!(
        caller_id = %request.caller_id,
        documents = request.documents.len(),
        "Streaming analysis requested"
    );

    let updates = state
        .analyzer
        .run(request.caller_id, request.documents, request.context);

    let body = async_stream::stream! {
        futures::pin_mut!(updates);
        while let Some(update) = updates.next().await {
            match update {
                Ok(update) => {
                    let name = if update.is_final() { "complete" } else { "partial" };
                    yield Event::json(name, &update).map(|event| event.to_bytes());
                }
                Err(e) => {
                    yield Event::json("error", &e.to_error_detail()).map(|event| event.to_bytes());
                }
            }
        }
        yield Ok(Event::done().to_bytes());
    };

    Ok(create_sse_response(body))
}

/// POST /api/v1/analysis/sync
async fn analyze_sync(
    state: web::Data<AppState>,
    payload: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse> {
    let request = payload.into_inner();
    request.validate()?;
    info!(
        caller_id = %request.caller_id,
        documents = request.documents.len(),
        "Analysis requested"
    );

    let result = state
        .analyzer
        .run_to_completion(request.caller_id, request.documents, request.context)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
