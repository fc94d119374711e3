//! Analysis provider test doubles

use async_trait::async_trait;
use parking_lot::Mutex;
use review_gateway::core::analysis::{
    AnalysisDepth, AnalysisMetadata, AnalysisProvider, AnalysisRequest, AnalysisResult,
};
use review_gateway::{GatewayError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Answers each phase from a script and records every call
pub struct ScriptedProvider {
    quick: Option<f64>,
    comprehensive: Option<f64>,
    delay: Duration,
    calls: Mutex<Vec<AnalysisDepth>>,
}

impl ScriptedProvider {
    /// Both phases succeed with the given confidences
    pub fn succeeding(quick: f64, comprehensive: f64) -> Arc<Self> {
        Self::build(Some(quick), Some(comprehensive), Duration::ZERO)
    }

    /// Quick scan succeeds, comprehensive pass fails
    pub fn failing_comprehensive(quick: f64) -> Arc<Self> {
        Self::build(Some(quick), None, Duration::ZERO)
    }

    /// Every call fails
    pub fn failing() -> Arc<Self> {
        Self::build(None, None, Duration::ZERO)
    }

    /// Both phases succeed after `delay`
    pub fn slow(delay: Duration) -> Arc<Self> {
        Self::build(Some(0.5), Some(0.8), delay)
    }

    fn build(quick: Option<f64>, comprehensive: Option<f64>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            quick,
            comprehensive,
            delay,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Depths requested so far, in order
    pub fn calls(&self) -> Vec<AnalysisDepth> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AnalysisProvider for ScriptedProvider {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        self.calls.lock().push(request.depth);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let confidence = match request.depth {
            AnalysisDepth::Quick => self.quick,
            AnalysisDepth::Comprehensive => self.comprehensive,
        }
        .ok_or_else(|| GatewayError::provider("scripted", Some(503), "model overloaded"))?;

        Ok(AnalysisResult {
            summary: format!("{:?} review of {} documents", request.depth, request.documents.len()),
            recommendations: vec![format!("{:?} recommendation", request.depth)],
            confidence,
            metadata: AnalysisMetadata {
                provider: "scripted".to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
