//! Completion providers — the closed set of text-generation backends the
//! router falls back across.
//!
//! ARCHITECTURAL RULE: no other module may talk to an inference backend
//! directly. Everything goes through `ProviderRouter`, which holds an
//! ordered list of `CompletionProvider` trait objects.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use thiserror::Error;

pub mod cloud;
pub mod ollama;
pub mod router;

/// Sampling temperature for every completion in this service.
/// Intentionally a constant — persona consistency over creativity knobs.
pub const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;

/// A single chat turn on the wire. Roles are the OpenAI-compatible strings
/// ("system" | "user" | "assistant") that all three backends accept.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Everything a provider needs to produce a completion. Mode (streaming vs
/// blocking) is selected by which router method the caller invokes.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: String, messages: Vec<ChatMessage>) -> Self {
        CompletionRequest {
            system,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// A one-shot request: system prompt plus a single user turn. Used by
    /// the extraction and analysis pipelines.
    pub fn single_turn(system: &str, user: &str) -> Self {
        Self::new(
            system.to_string(),
            vec![ChatMessage {
                role: "user",
                content: user.to_string(),
            }],
        )
    }
}

/// Failure of one backend. Absorbed by the router's fallback chain and
/// never surfaced to a caller on its own.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("malformed stream event: {0}")]
    Stream(String),

    #[error("provider returned empty content")]
    EmptyContent,
}

impl ProviderError {
    /// Rate limits are classified distinctly for observability, though the
    /// fallback transition is the same as for any other handshake failure.
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::Api { status: 429, .. }
        )
    }
}

/// Incremental text chunks from a streaming completion. An `Err` item is
/// terminal for the request: once delivery has begun there is no fallback.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// True for backends reached over the local network rather than a cloud
    /// API. Drives the `providerPreference` ordering in the router.
    fn is_local(&self) -> bool {
        false
    }

    async fn generate_blocking(&self, request: &CompletionRequest)
        -> Result<String, ProviderError>;

    async fn generate_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<TextStream, ProviderError>;
}
