//! [`RecommendationEngine`] over a chat-completion HTTP API.
//!
//! Two wire dialects are supported:
//!
//! * **Ollama**: `POST {base_url}/api/chat` with `stream: false` and
//!   `format: "json"`; the answer is `message.content`.
//! * **OpenAI-compatible**: `POST {base_url}/chat/completions` with
//!   `response_format: {"type": "json_object"}` and an optional bearer key;
//!   the answer is `choices[0].message.content`.
//!
//! One `reqwest::Client` is built at construction and reused for every call.
//! Each call is bounded by the configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{EngineError, RecommendationEngine};

const SYSTEM_PROMPT: &str = "You are a trading analyst. Reply with one JSON object only.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatBackend {
    Ollama,
    #[serde(rename = "openai")]
    OpenAiCompatible,
}

#[derive(Debug, Clone)]
pub struct ChatEngineConfig {
    pub backend: ChatBackend,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
    pub temperature: f32,
}

pub struct ChatEngine {
    client: Client,
    config: ChatEngineConfig,
    endpoint: String,
}

impl ChatEngine {
    pub fn new(config: ChatEngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let endpoint = endpoint(config.backend, &config.base_url);
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn chat(&self, prompt: &str) -> Result<String, EngineError> {
        let body = request_body(&self.config, prompt);
        tracing::debug!(endpoint = %self.endpoint, model = %self.config.model, "engine request");

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status { status, body });
        }

        let envelope: Value = response.json().await.map_err(|e| self.classify(e))?;
        let content = extract_content(self.config.backend, &envelope)?;
        tracing::debug!(answer = %content, "engine answer");
        Ok(content)
    }

    fn classify(&self, err: reqwest::Error) -> EngineError {
        if err.is_timeout() {
            EngineError::Timeout(self.config.timeout)
        } else {
            EngineError::Http(err)
        }
    }
}

#[async_trait]
impl RecommendationEngine for ChatEngine {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn request_recommendation(&self, prompt: &str) -> Result<String, EngineError> {
        self.chat(prompt).await
    }

    async fn request_trend_analysis(&self, prompt: &str) -> Result<String, EngineError> {
        self.chat(prompt).await
    }
}

fn endpoint(backend: ChatBackend, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match backend {
        ChatBackend::Ollama => format!("{base}/api/chat"),
        ChatBackend::OpenAiCompatible => format!("{base}/chat/completions"),
    }
}

fn request_body(config: &ChatEngineConfig, prompt: &str) -> Value {
    let messages = json!([
        { "role": "system", "content": SYSTEM_PROMPT },
        { "role": "user", "content": prompt },
    ]);
    match config.backend {
        ChatBackend::Ollama => json!({
            "model": config.model,
            "messages": messages,
            "stream": false,
            "format": "json",
            "options": { "temperature": config.temperature },
        }),
        ChatBackend::OpenAiCompatible => json!({
            "model": config.model,
            "messages": messages,
            "temperature": config.temperature,
            "response_format": { "type": "json_object" },
        }),
    }
}

fn extract_content(backend: ChatBackend, envelope: &Value) -> Result<String, EngineError> {
    let content = match backend {
        ChatBackend::Ollama => envelope.pointer("/message/content"),
        ChatBackend::OpenAiCompatible => envelope.pointer("/choices/0/message/content"),
    };
    let text = content
        .ok_or_else(|| EngineError::Decode(format!("no message content in {envelope}")))?
        .as_str()
        .ok_or_else(|| EngineError::Decode("message content is not a string".into()))?;
    if text.trim().is_empty() {
        return Err(EngineError::EmptyResponse);
    }
    Ok(text.to_string())
}
