//! Pluggable AI classifier backends.
//!
//! One implementation per backend, registered by name in an explicit
//! [`BackendRegistry`] that is injected into the gateway. No global
//! provider table; tests inject deterministic doubles.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::BackendError;

/// Default backend call timeout. No retries: a single failure triggers
/// immediate fallback.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// A single completion call to an AI backend.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt describing the task and output schema.
    pub system_prompt: String,
    /// Content to classify.
    pub user_prompt: String,
    /// Output token budget; kept small so responses stay compact.
    pub max_tokens: u32,
    /// Sampling temperature; kept low for near-deterministic output.
    pub temperature: f32,
}

/// A named AI backend able to produce structured classification output.
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    /// Runs the completion and returns the raw model text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BackendError>;

    /// Returns the backend's registered name.
    fn name(&self) -> &str;
}

/// Explicit name-to-backend lookup injected into the gateway.
#[derive(Default, Clone)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn ClassifierBackend>>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a backend under its own name, replacing any previous
    /// registration.
    pub fn register(&mut self, backend: Arc<dyn ClassifierBackend>) {
        self.backends.insert(backend.name().to_string(), backend);
    }

    /// Looks up a backend by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ClassifierBackend>> {
        self.backends.get(name).cloned()
    }

    /// Returns the registered backend names.
    pub fn names(&self) -> Vec<&str> {
        self.backends.keys().map(|k| k.as_str()).collect()
    }

    /// Returns true if no backends are registered.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// Configuration for an OpenAI-compatible chat completions backend.
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OpenAiCompatConfig {
    /// Creates a config with the default timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Backend speaking the OpenAI chat completions wire format, which most
/// hosted and self-hosted model servers accept.
pub struct OpenAiCompatBackend {
    name: String,
    config: OpenAiCompatConfig,
    client: reqwest::Client,
}

impl OpenAiCompatBackend {
    /// Creates a backend registered under `name`.
    pub fn new(name: impl Into<String>, config: OpenAiCompatConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            config,
            client,
        })
    }
}

#[async_trait]
impl ClassifierBackend for OpenAiCompatBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Network(format!(
                "backend returned status {status}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                BackendError::InvalidResponse("missing message content in response".to_string())
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
