//! Gateway over the pluggable AI backends.
//!
//! Sends a system+user prompt pair to a named backend, validates the
//! structured output against one of two strict schemas, and normalizes
//! every field. Any failure (unknown backend, network error, schema
//! mismatch) is converted into a fallback classification; this component
//! never returns an error to its caller.

use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{BackendRegistry, CompletionRequest};
use crate::error::BackendError;
use crate::fallback::{report_fallback, topic_fallback, FallbackLexicon};
use crate::prompts::CLASSIFIER_TEMPERATURE;
use crate::verdict::{ReportVerdict, TopicVerdict};

/// Gateway routing classification prompts to a named backend, with
/// decode-or-default normalization and heuristic fallback.
pub struct ClassifierGateway {
    registry: BackendRegistry,
    lexicon: FallbackLexicon,
}

impl ClassifierGateway {
    /// Creates a gateway with the default fallback lexicon.
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            registry,
            lexicon: FallbackLexicon::default(),
        }
    }

    /// Creates a gateway with a custom fallback lexicon.
    pub fn with_lexicon(registry: BackendRegistry, lexicon: FallbackLexicon) -> Self {
        Self { registry, lexicon }
    }

    /// Classifies reported content. Falls back to the heuristic report
    /// classifier on any backend or schema failure.
    pub async fn classify_report(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        backend_name: &str,
    ) -> ReportVerdict {
        match self
            .request(system_prompt, user_prompt, max_tokens, backend_name)
            .await
            .and_then(|raw| parse_report(&raw))
        {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(backend = backend_name, %error, "report classification fell back");
                report_fallback(&self.lexicon, user_prompt, &error)
            }
        }
    }

    /// Classifies a suggested topic. Falls back to the heuristic topic
    /// classifier on any backend or schema failure.
    pub async fn classify_topic(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        backend_name: &str,
    ) -> TopicVerdict {
        match self
            .request(system_prompt, user_prompt, max_tokens, backend_name)
            .await
            .and_then(|raw| parse_topic(&raw))
        {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(backend = backend_name, %error, "topic classification fell back");
                topic_fallback(&self.lexicon, user_prompt, &error)
            }
        }
    }

    async fn request(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        backend_name: &str,
    ) -> Result<String, BackendError> {
        let backend = self
            .registry
            .get(backend_name)
            .ok_or_else(|| BackendError::NotConfigured(backend_name.to_string()))?;

        let request = CompletionRequest {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            max_tokens,
            temperature: CLASSIFIER_TEMPERATURE,
        };

        debug!(backend = backend_name, max_tokens, "dispatching classification request");
        backend.complete(&request).await
    }
}

/// Decodes the report schema. `is_violating` and `confidence` are
/// required; `confidence` is clamped in the verdict constructor.
fn parse_report(raw: &str) -> Result<ReportVerdict, BackendError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| BackendError::InvalidResponse(format!("not valid JSON: {e}")))?;

    let is_violating = value["is_violating"]
        .as_bool()
        .ok_or_else(|| BackendError::InvalidResponse("missing is_violating".to_string()))?;
    let confidence = number_field(&value, "confidence")?;
    let reason = value["reason"].as_str().map(|s| s.to_string());

    Ok(ReportVerdict::new(is_violating, confidence, reason))
}

/// Decodes the suitability schema. `is_approved`, `suitability_score` and
/// `confidence` are required; array fields are coerced with documented
/// defaults when absent or malformed.
fn parse_topic(raw: &str) -> Result<TopicVerdict, BackendError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| BackendError::InvalidResponse(format!("not valid JSON: {e}")))?;

    let is_approved = value["is_approved"]
        .as_bool()
        .ok_or_else(|| BackendError::InvalidResponse("missing is_approved".to_string()))?;
    let suitability_score = number_field(&value, "suitability_score")?;
    let confidence = number_field(&value, "confidence")?;

    Ok(TopicVerdict::new(
        is_approved,
        suitability_score,
        string_array(&value, "categories"),
        string_array(&value, "reasons"),
        string_array(&value, "suggestions"),
        confidence,
    ))
}

fn number_field(value: &Value, field: &str) -> Result<f32, BackendError> {
    value[field]
        .as_f64()
        .map(|n| n as f32)
        .ok_or_else(|| BackendError::InvalidResponse(format!("missing numeric field {field}")))
}

/// Coerces a field to an array of strings; non-array or missing values
/// become an empty list, which the verdict constructor replaces with its
/// placeholder default.
fn string_array(value: &Value, field: &str) -> Vec<String> {
    match value[field].as_array() {
        Some(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(|s| s.to_string()))
            .collect(),
        None => Vec::new(),
    }
}
