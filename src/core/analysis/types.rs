//! Analysis request and result types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A document already extracted to text by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: None,
            content: content.into(),
        }
    }
}

/// Questionnaire answers and workflow context supplied with the documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub answers: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    /// Fast scan over the first part of each document
    Quick,
    /// Full review of every document
    Comprehensive,
}

/// Input to an `AnalysisProvider`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub documents: Vec<DocumentRef>,
    #[serde(default)]
    pub context: UserContext,
    pub depth: AnalysisDepth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default)]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

/// Monotonic phase tag: `quick` then `complete`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisPhase {
    #[default]
    Quick,
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub phase: AnalysisPhase,
    pub documents_analyzed: usize,
    pub processing_time_ms: u64,
    /// False when the final result was synthesized from the partial one
    pub comprehensive_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(default)]
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// In `[0, 1]`
    pub confidence: f64,
    #[serde(default)]
    pub metadata: AnalysisMetadata,
}

/// States of one progressive analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    Scanning,
    PartialReady,
    Finalizing,
    ErrorFallback,
    Complete,
}

/// One result surfaced by a progressive run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisUpdate {
    pub state: AnalysisState,
    pub phase: AnalysisPhase,
    pub result: AnalysisResult,
    pub elapsed_ms: u64,
}

impl AnalysisUpdate {
    pub fn is_final(&self) -> bool {
        self.phase == AnalysisPhase::Complete
    }
}
