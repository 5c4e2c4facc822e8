//! Provider router — ordered fallback over the completion backends.
//!
//! State machine per request: Idle → Attempting(i) → Delivering → Done.
//! A handshake failure moves to Attempting(i+1); exhausting the list is
//! Failed. Delivering never transitions back to Attempting: once a provider
//! has begun yielding content, a mid-stream failure is terminal for the
//! request, because partial output has already reached the caller.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::providers::{CompletionProvider, CompletionRequest, TextStream};

/// Terminal failure: every provider in the chain was attempted (or the
/// per-request timeout expired first). The attempted names are diagnostic
/// detail for logs; callers surface a generic message.
#[derive(Debug, Error)]
#[error("all completion providers failed (attempted: {})", attempted.join(", "))]
pub struct AllProvidersFailed {
    pub attempted: Vec<String>,
}

/// Caller hint for chain ordering. `local` promotes local-network backends
/// to the front of the list; the set of providers never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderPreference {
    #[default]
    Cloud,
    Local,
}

pub struct ProviderRouter {
    providers: Vec<Arc<dyn CompletionProvider>>,
    request_timeout: Duration,
}

impl ProviderRouter {
    pub fn new(providers: Vec<Arc<dyn CompletionProvider>>, request_timeout: Duration) -> Self {
        ProviderRouter {
            providers,
            request_timeout,
        }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    fn ordered(&self, preference: ProviderPreference) -> Vec<Arc<dyn CompletionProvider>> {
        match preference {
            ProviderPreference::Cloud => self.providers.clone(),
            ProviderPreference::Local => {
                let (local, cloud): (Vec<_>, Vec<_>) =
                    self.providers.iter().cloned().partition(|p| p.is_local());
                local.into_iter().chain(cloud).collect()
            }
        }
    }

    /// Blocking completion with ordered fallback. One provider at a time,
    /// each contacted at most once, no backoff within a provider.
    pub async fn complete_blocking(
        &self,
        request: &CompletionRequest,
        preference: ProviderPreference,
    ) -> Result<String, AllProvidersFailed> {
        let providers = self.ordered(preference);
        match tokio::time::timeout(self.request_timeout, try_blocking(&providers, request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_secs = self.request_timeout.as_secs(),
                    "request timeout expired across fallback attempts"
                );
                Err(AllProvidersFailed {
                    attempted: providers.iter().map(|p| p.name().to_string()).collect(),
                })
            }
        }
    }

    /// Streaming completion with ordered fallback. The timeout bounds the
    /// handshake phase; once a stream is delivering, the consumer owns it
    /// and an error item ends the request without further attempts.
    pub async fn complete_streaming(
        &self,
        request: &CompletionRequest,
        preference: ProviderPreference,
    ) -> Result<TextStream, AllProvidersFailed> {
        let providers = self.ordered(preference);
        match tokio::time::timeout(self.request_timeout, try_streaming(&providers, request)).await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_secs = self.request_timeout.as_secs(),
                    "request timeout expired before any provider began delivering"
                );
                Err(AllProvidersFailed {
                    attempted: providers.iter().map(|p| p.name().to_string()).collect(),
                })
            }
        }
    }
}

async fn try_blocking(
    providers: &[Arc<dyn CompletionProvider>],
    request: &CompletionRequest,
) -> Result<String, AllProvidersFailed> {
    let mut attempted = Vec::with_capacity(providers.len());
    for provider in providers {
        attempted.push(provider.name().to_string());
        debug!(provider = provider.name(), "attempting blocking completion");
        match provider.generate_blocking(request).await {
            Ok(text) => {
                info!(provider = provider.name(), chars = text.len(), "completion delivered");
                return Ok(text);
            }
            Err(e) if e.is_rate_limit() => {
                warn!(provider = provider.name(), "provider rate limited, advancing");
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "provider failed, advancing");
            }
        }
    }
    Err(AllProvidersFailed { attempted })
}

async fn try_streaming(
    providers: &[Arc<dyn CompletionProvider>],
    request: &CompletionRequest,
) -> Result<TextStream, AllProvidersFailed> {
    let mut attempted = Vec::with_capacity(providers.len());
    for provider in providers {
        attempted.push(provider.name().to_string());
        debug!(provider = provider.name(), "attempting streaming handshake");
        match provider.generate_streaming(request).await {
            Ok(stream) => {
                info!(provider = provider.name(), "stream delivering");
                return Ok(stream);
            }
            Err(e) if e.is_rate_limit() => {
                warn!(provider = provider.name(), "provider rate limited, advancing");
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "handshake failed, advancing");
            }
        }
    }
    Err(AllProvidersFailed { attempted })
}
