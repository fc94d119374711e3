//! Progressive document analysis
//!
//! Each run submits a quick scan through the scheduler and surfaces it as soon
//! as it lands, then submits a comprehensive review and reconciles the two.
//! A failed comprehensive phase degrades to the partial result instead of
//! failing the run.

mod provider;
mod types;


pub use provider::{AnalysisProvider, LlmAnalysisProvider};
pub use types::{
    AnalysisDepth, AnalysisMetadata, AnalysisPhase, AnalysisRequest, AnalysisResult,
    AnalysisState, AnalysisUpdate, DocumentRef, Finding, Severity, UserContext,
};

use crate::config::models::analysis::AnalysisConfig;
use crate::core::rate_limiter::{RateLimitManager, RequestPriority, SubmitOptions};
use crate::utils::ai::TokenUtils;
use crate::utils::error::{GatewayError, Result};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Characters per document counted toward the quick-scan estimate
const QUICK_ESTIMATE_CHARS: usize = 2_000;

/// Two-phase analysis driven through the shared scheduler
#[derive(Clone)]
pub struct ProgressiveAnalyzer {
    scheduler: RateLimitManager,
    provider: Arc<dyn AnalysisProvider>,
    config: AnalysisConfig,
}

impl std::fmt::Debug for ProgressiveAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressiveAnalyzer")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

impl ProgressiveAnalyzer {
    pub fn new(
        scheduler: RateLimitManager,
        provider: Arc<dyn AnalysisProvider>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            scheduler,
            provider,
            config,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run both phases, yielding the partial update and then the final one.
    ///
    /// A quick-scan failure yields a single `Err` and ends the stream.
    pub fn run(
        &self,
        caller_id: String,
        documents: Vec<DocumentRef>,
        context: UserContext,
    ) -> impl Stream<Item = Result<AnalysisUpdate>> + Send + 'static {
        let analyzer = self.clone();

        async_stream::stream! {
            let started = Instant::now();
            let documents_analyzed = documents.len();
            info!(caller_id = %caller_id, documents = documents_analyzed, state = ?AnalysisState::Scanning, "Analysis started");

            let quick = AnalysisRequest {
                documents: documents.clone(),
                context: context.clone(),
                depth: AnalysisDepth::Quick,
            };
            let quick_options = SubmitOptions::new(RequestPriority::High, analyzer.estimate(&quick))
                .with_max_wait(analyzer.config.quick_max_wait());

            let mut partial = match analyzer.submit(&caller_id, quick, quick_options).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(caller_id = %caller_id, error = %e, "Quick scan failed");
                    yield Err(e);
                    return;
                }
            };
            partial.confidence = clamp_confidence(partial.confidence);
            partial.metadata.phase = AnalysisPhase::Quick;
            partial.metadata.documents_analyzed = documents_analyzed;
            partial.metadata.comprehensive_completed = false;
            partial.metadata.processing_time_ms = elapsed_ms(started);

            info!(
                caller_id = %caller_id,
                state = ?AnalysisState::PartialReady,
                confidence = partial.confidence,
                elapsed_ms = partial.metadata.processing_time_ms,
                "Partial analysis ready"
            );
            yield Ok(AnalysisUpdate {
                state: AnalysisState::PartialReady,
                phase: AnalysisPhase::Quick,
                result: partial.clone(),
                elapsed_ms: elapsed_ms(started),
            });

            let comprehensive = AnalysisRequest {
                documents,
                context,
                depth: AnalysisDepth::Comprehensive,
            };
            let comprehensive_options = SubmitOptions::new(
                analyzer.config.comprehensive_priority,
                analyzer.estimate(&comprehensive),
            )
            .with_max_wait(analyzer.config.comprehensive_max_wait());

            let mut result = match analyzer
                .submit(&caller_id, comprehensive, comprehensive_options)
                .await
            {
                Ok(full) => merge_comprehensive(&partial, full),
                Err(e) => {
                    warn!(
                        caller_id = %caller_id,
                        state = ?AnalysisState::ErrorFallback,
                        error = %e,
                        "Comprehensive analysis failed, falling back to partial result"
                    );
                    fallback_from_partial(&partial, analyzer.config.fallback_confidence_boost, &e)
                }
            };
            result.metadata.documents_analyzed = documents_analyzed;
            result.metadata.processing_time_ms = elapsed_ms(started);

            info!(
                caller_id = %caller_id,
                state = ?AnalysisState::Complete,
                confidence = result.confidence,
                comprehensive_completed = result.metadata.comprehensive_completed,
                elapsed_ms = result.metadata.processing_time_ms,
                "Analysis complete"
            );
            yield Ok(AnalysisUpdate {
                state: AnalysisState::Complete,
                phase: AnalysisPhase::Complete,
                result,
                elapsed_ms: elapsed_ms(started),
            });
        }
    }

    /// Drain `run` and return the final result
    pub async fn run_to_completion(
        &self,
        caller_id: String,
        documents: Vec<DocumentRef>,
        context: UserContext,
    ) -> Result<AnalysisResult> {
        let stream = self.run(caller_id, documents, context);
        futures::pin_mut!(stream);

        let mut last = None;
        while let Some(update) = stream.next().await {
            last = Some(update?);
        }

        last.filter(AnalysisUpdate::is_final)
            .map(|update| update.result)
            .ok_or_else(|| GatewayError::internal("Analysis ended without a final result"))
    }

    async fn submit(
        &self,
        caller_id: &str,
        request: AnalysisRequest,
        options: SubmitOptions,
    ) -> Result<AnalysisResult> {
        let provider = self.provider.clone();
        self.scheduler
            .submit(
                caller_id,
                async move { provider.analyze(request).await },
                options,
            )
            .await
    }

    /// Configured floor, raised for large document sets but never past the
    /// per-minute token ceiling
    fn estimate(&self, request: &AnalysisRequest) -> u32 {
        let texts = request.documents.iter().map(|doc| doc.content.as_str());
        let (floor, measured) = match request.depth {
            AnalysisDepth::Quick => (
                self.config.quick_estimated_tokens,
                TokenUtils::estimate_truncated(texts, QUICK_ESTIMATE_CHARS),
            ),
            AnalysisDepth::Comprehensive => (
                self.config.comprehensive_estimated_tokens,
                texts
                    .map(TokenUtils::estimate_tokens)
                    .fold(0u32, u32::saturating_add),
            ),
        };

        let ceiling = self.scheduler.config().tokens_per_minute;
        floor.max(measured).min(ceiling.max(1))
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// The comprehensive result replaces the partial content; confidence never drops
pub fn merge_comprehensive(partial: &AnalysisResult, full: AnalysisResult) -> AnalysisResult {
    let recommendations = if full.recommendations.is_empty() {
        partial.recommendations.clone()
    } else {
        full.recommendations
    };

    AnalysisResult {
        summary: full.summary,
        findings: full.findings,
        recommendations,
        confidence: clamp_confidence(full.confidence).max(partial.confidence),
        metadata: AnalysisMetadata {
            phase: AnalysisPhase::Complete,
            comprehensive_completed: true,
            fallback_reason: None,
            ..full.metadata
        },
    }
}

/// Final result synthesized from the partial one with boosted confidence
pub fn fallback_from_partial(
    partial: &AnalysisResult,
    boost: f64,
    error: &GatewayError,
) -> AnalysisResult {
    let mut result = partial.clone();
    result.confidence = (partial.confidence + boost.max(0.0)).min(1.0);
    result.metadata.phase = AnalysisPhase::Complete;
    result.metadata.comprehensive_completed = false;
    result.metadata.fallback_reason = Some(error.to_string());
    result
}
