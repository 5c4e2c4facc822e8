//! Local inference backend. Same contract as the cloud providers, addressed
//! by host/port and a model identifier instead of an API key. Streaming
//! responses are newline-delimited JSON rather than SSE.

use bytes::Bytes;
use futures_util::{future, stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::{
    ChatMessage, CompletionProvider, CompletionRequest, ProviderError, TextStream,
};

use async_trait::async_trait;

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(host: &str, port: u16, model: String) -> Self {
        OllamaProvider {
            client: Client::new(),
            base_url: format!("http://{host}:{port}"),
            model,
        }
    }

    fn body(&self, request: &CompletionRequest, stream: bool) -> OllamaChatBody {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: request.system.clone(),
            });
        }
        for message in &request.messages {
            messages.push(OllamaMessage {
                role: message.role.to_string(),
                content: message.content.clone(),
            });
        }
        OllamaChatBody {
            model: self.model.clone(),
            messages,
            stream,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }

    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<reqwest::Response, ProviderError> {
        debug!(model = %self.model, stream, "sending request to local inference");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&self.body(request, stream))
            .send()
            .await?;

        let status = response.status();
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
impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "local-ollama"
    }

    fn is_local(&self) -> bool {
        true
    }

    async fn generate_blocking(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, ProviderError> {
        let response = self.send(request, false).await?;
        let parsed: OllamaChatResponse = response.json().await?;
        if parsed.message.content.is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        Ok(parsed.message.content)
    }

    async fn generate_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<TextStream, ProviderError> {
        let response = self.send(request, true).await?;
        let stream = response
            .bytes_stream()
            .scan(String::new(), |buf, chunk: Result<Bytes, reqwest::Error>| {
                let events = match chunk {
                    Ok(bytes) => {
                        buf.push_str(&String::from_utf8_lossy(&bytes));
                        drain_ndjson_events(buf)
                    }
                    Err(e) => vec![Err(ProviderError::Http(e))],
                };
                future::ready(Some(stream::iter(events)))
            })
            .flatten();
        Ok(Box::pin(stream))
    }
}

/// Consumes complete NDJSON lines; each carries one content delta until a
/// final object with `done: true`.
fn drain_ndjson_events(buf: &mut String) -> Vec<Result<String, ProviderError>> {
    let mut events = Vec::new();
    while let Some(pos) = buf.find('\n') {
        let line: String = buf.drain(..=pos).collect();
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<OllamaChatResponse>(line) {
            Ok(chunk) => {
                if !chunk.message.content.is_empty() {
                    events.push(Ok(chunk.message.content));
                }
                if chunk.done {
                    break;
                }
            }
            Err(e) => events.push(Err(ProviderError::Stream(e.to_string()))),
        }
    }
    events
}

#[derive(Debug, Serialize)]
struct OllamaChatBody {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_ndjson_extracts_deltas_until_done() {
        let mut buf = String::from(
            "{\"message\":{\"role\":\"assistant\",\"content\":\"one \"},\"done\":false}\n\
             {\"message\":{\"role\":\"assistant\",\"content\":\"two\"},\"done\":false}\n\
             {\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true}\n",
        );
        let events = drain_ndjson_events(&mut buf);
        let texts: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(texts, vec!["one ", "two"]);
    }

    #[test]
    fn test_drain_ndjson_keeps_partial_line() {
        let mut buf = String::from("{\"message\":{\"role\":\"assistant\",\"con");
        let events = drain_ndjson_events(&mut buf);
        assert!(events.is_empty());
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_ollama_provider_is_local() {
        let provider = OllamaProvider::new("localhost", 11434, "llama3".into());
        assert!(provider.is_local());
        assert_eq!(provider.name(), "local-ollama");
    }
}
