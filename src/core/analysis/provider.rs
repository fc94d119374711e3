//! Analysis providers: the units of work the scheduler runs

use super::types::{
    AnalysisDepth, AnalysisMetadata, AnalysisPhase, AnalysisRequest, AnalysisResult, Finding,
};
use crate::config::models::provider::ProviderConfig;
use crate::utils::ai::TokenUtils;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Characters of each document sent for a quick scan
const QUICK_SCAN_CHARS: usize = 2_000;
/// Characters of each document sent for a comprehensive review
const COMPREHENSIVE_CHARS: usize = 24_000;

const QUICK_PROMPT: &str = "You are a document reviewer performing a quick first pass. \
Only the opening of each document is provided. Identify the most important issues and \
give a short summary. Respond with a JSON object with keys: summary (string), \
findings (array of {category, title, description, severity, document_id}), \
recommendations (array of strings), confidence (number between 0 and 1).";

const COMPREHENSIVE_PROMPT: &str = "You are a document reviewer performing a thorough review. \
Read every document in full together with the questionnaire answers, and report all \
material findings. Respond with a JSON object with keys: summary (string), \
findings (array of {category, title, description, severity, document_id}), \
recommendations (array of strings), confidence (number between 0 and 1).";

/// Something that can analyze a document set
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult>;

    fn name(&self) -> &str;
}

/// OpenAI-compatible chat completions backend
#[derive(Debug, Clone)]
pub struct LlmAnalysisProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

/// The JSON object the model is asked to return
#[derive(Debug, Deserialize)]
struct ModelAnalysis {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    findings: Vec<Finding>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl LlmAnalysisProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(GatewayError::HttpClient)?;
        Ok(Self { client, config })
    }

    fn build_body(&self, request: &AnalysisRequest) -> serde_json::Value {
        let (prompt, max_chars, max_tokens) = match request.depth {
            AnalysisDepth::Quick => (QUICK_PROMPT, QUICK_SCAN_CHARS, self.config.quick_max_tokens),
            AnalysisDepth::Comprehensive => (
                COMPREHENSIVE_PROMPT,
                COMPREHENSIVE_CHARS,
                self.config.comprehensive_max_tokens,
            ),
        };

        let mut user = String::new();
        for doc in &request.documents {
            user.push_str(&format!("## Document {} ({})\n", doc.id, doc.name));
            user.push_str(TokenUtils::truncate_chars(&doc.content, max_chars));
            user.push_str("\n\n");
        }
        if !request.context.answers.is_empty() {
            user.push_str("## Questionnaire answers\n");
            user.push_str(&json!(request.context.answers).to_string());
            user.push('\n');
        }

        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": prompt },
                { "role": "user", "content": user },
            ],
            "max_tokens": max_tokens,
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
        })
    }

    fn parse_content(&self, content: &str, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let trimmed = strip_code_fence(content);
        let parsed: ModelAnalysis = serde_json::from_str(trimmed).map_err(|e| {
            GatewayError::parsing(format!("Provider returned malformed analysis JSON: {}", e))
        })?;

        let confidence = if parsed.confidence.is_finite() {
            parsed.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(AnalysisResult {
            summary: parsed.summary,
            findings: parsed.findings,
            recommendations: parsed.recommendations,
            confidence,
            metadata: AnalysisMetadata {
                phase: match request.depth {
                    AnalysisDepth::Quick => AnalysisPhase::Quick,
                    AnalysisDepth::Comprehensive => AnalysisPhase::Complete,
                },
                documents_analyzed: request.documents.len(),
                comprehensive_completed: request.depth == AnalysisDepth::Comprehensive,
                provider: self.config.name.clone(),
                ..AnalysisMetadata::default()
            },
        })
    }
}

#[async_trait]
impl AnalysisProvider for LlmAnalysisProvider {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        let url = self.config.chat_completions_url();
        let body = self.build_body(&request);
        debug!(
            provider = %self.config.name,
            model = %self.config.model,
            depth = ?request.depth,
            documents = request.documents.len(),
            "Sending analysis request"
        );

        let mut builder = self.client.post(&url).json(&body);
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(provider = %self.config.name, status = status.as_u16(), "Analysis request failed");
            return Err(GatewayError::provider(
                self.config.name.clone(),
                Some(status.as_u16()),
                text,
            ));
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GatewayError::provider(self.config.name.clone(), None, "Response had no content")
            })?;

        self.parse_content(&content, &request)
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
