//! Cloud completion backends speaking the OpenAI-compatible chat API.
//!
//! Two variants share this client: the primary (Groq) and the fallback
//! (OpenRouter). They differ only in base URL, key, and default model.

use bytes::Bytes;
use futures_util::{future, stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::{
    ChatMessage, CompletionProvider, CompletionRequest, ProviderError, TextStream,
};

use async_trait::async_trait;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub struct CloudProvider {
    name: String,
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CloudProvider {
    /// Primary cloud backend.
    pub fn groq(api_key: String, model: String) -> Self {
        Self::new("groq-primary", GROQ_BASE_URL, api_key, model)
    }

    /// Fallback cloud backend, same wire format as the primary.
    pub fn openrouter(api_key: String, model: String) -> Self {
        Self::new("openrouter-fallback", OPENROUTER_BASE_URL, api_key, model)
    }

    fn new(name: &str, base_url: &str, api_key: String, model: String) -> Self {
        CloudProvider {
            name: name.to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.to_string(),
            api_key,
            model,
        }
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<reqwest::Response, ProviderError> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: wire_messages(&request.system, &request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream,
        };

        debug!(provider = %self.name, model = %self.model, stream, "sending completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for CloudProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_blocking(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, ProviderError> {
        let response = self.send(request, false).await?;
        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::EmptyContent)
    }

    async fn generate_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<TextStream, ProviderError> {
        let response = self.send(request, true).await?;
        Ok(sse_delta_stream(response))
    }
}

fn wire_messages<'a>(system: &'a str, history: &'a [ChatMessage]) -> Vec<WireMessage<'a>> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    if !system.is_empty() {
        messages.push(WireMessage {
            role: "system",
            content: system,
        });
    }
    for message in history {
        messages.push(WireMessage {
            role: message.role,
            content: &message.content,
        });
    }
    messages
}

/// Turns an SSE response body into a stream of content deltas.
/// `data:` lines carry JSON chunks; `[DONE]` and comment lines are skipped.
fn sse_delta_stream(response: reqwest::Response) -> TextStream {
    let stream = response
        .bytes_stream()
        .scan(String::new(), |buf, chunk: Result<Bytes, reqwest::Error>| {
            let events = match chunk {
                Ok(bytes) => {
                    buf.push_str(&String::from_utf8_lossy(&bytes));
                    drain_sse_events(buf)
                }
                Err(e) => vec![Err(ProviderError::Http(e))],
            };
            future::ready(Some(stream::iter(events)))
        })
        .flatten();
    Box::pin(stream)
}

/// Consumes complete lines from the buffer, leaving any partial trailing
/// line for the next network chunk.
fn drain_sse_events(buf: &mut String) -> Vec<Result<String, ProviderError>> {
    let mut events = Vec::new();
    while let Some(pos) = buf.find('\n') {
        let line: String = buf.drain(..=pos).collect();
        let line = line.trim();
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();
        if data == "[DONE]" {
            continue;
        }
        match serde_json::from_str::<StreamChunk>(data) {
            Ok(chunk) => {
                if let Some(text) = chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.delta.content)
                {
                    if !text.is_empty() {
                        events.push(Ok(text));
                    }
                }
            }
            Err(e) => events.push(Err(ProviderError::Stream(e.to_string()))),
        }
    }
    events
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_sse_events_extracts_deltas() {
        let mut buf = String::from(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\
             data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\
             data: [DONE]\n",
        );
        let events = drain_sse_events(&mut buf);
        let texts: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(texts, vec!["Hel", "lo"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_drain_sse_events_keeps_partial_line() {
        let mut buf = String::from("data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\ndata: {\"cho");
        let events = drain_sse_events(&mut buf);
        assert_eq!(events.len(), 1);
        assert_eq!(buf, "data: {\"cho");
    }

    #[test]
    fn test_drain_sse_events_skips_comments_and_empty_deltas() {
        let mut buf = String::from(
            ": keep-alive\n\
             data: {\"choices\":[{\"delta\":{}}]}\n\
             data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n",
        );
        let events = drain_sse_events(&mut buf);
        assert!(events.is_empty());
    }

    #[test]
    fn test_drain_sse_events_reports_malformed_chunk() {
        let mut buf = String::from("data: {not json}\n");
        let events = drain_sse_events(&mut buf);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(ProviderError::Stream(_))));
    }

    #[test]
    fn test_wire_messages_prepends_system() {
        let history = vec![
            ChatMessage {
                role: "user",
                content: "hi".into(),
            },
            ChatMessage {
                role: "assistant",
                content: "hello".into(),
            },
        ];
        let wire = wire_messages("persona", &history);
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0].role, "system");
        assert_eq!(wire[2].content, "hello");
    }
}
