//! Language-model boundary: formatted prompt in, raw answer text out.

pub mod chat;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use chat::{ChatBackend, ChatEngine, ChatEngineConfig};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("engine returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("engine returned an empty answer")]
    EmptyResponse,

    #[error("could not decode engine envelope: {0}")]
    Decode(String),
}

/// Text-in/text-out recommendation service.
///
/// Implementations make exactly one call per request and never retry.
#[async_trait]
pub trait RecommendationEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn request_recommendation(&self, prompt: &str) -> Result<String, EngineError>;

    async fn request_trend_analysis(&self, prompt: &str) -> Result<String, EngineError>;
}
