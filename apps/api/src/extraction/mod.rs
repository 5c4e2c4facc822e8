//! Two-stage document extraction: deterministic text reconstruction, then
//! AI-assisted structuring into a `CandidateProfile`.
//!
//! Every stage failure is typed; the handler layer maps the stage onto the
//! success/failure envelope the UI collaborator expects.

use thiserror::Error;
use tracing::info;

use crate::models::profile::CandidateProfile;
use crate::providers::router::{AllProvidersFailed, ProviderPreference, ProviderRouter};
use crate::providers::CompletionRequest;
use crate::structured::{self, ParseError};

pub mod handlers;
pub mod prompts;
pub mod reconstruct;

use reconstruct::TextFragment;

/// Top-level fields the structuring completion must produce.
pub const REQUIRED_PROFILE_FIELDS: &[&str] = &["name", "skills", "experience", "education"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document contains no extractable text ({chars} characters, minimum {min})")]
    InsufficientText { chars: usize, min: usize },

    #[error("failed to decode document: {0}")]
    Decode(String),

    #[error(transparent)]
    Providers(#[from] AllProvidersFailed),

    #[error("model output did not match the profile schema: {0}")]
    Structuring(#[from] ParseError),
}

impl ExtractError {
    /// Which pipeline stage failed, for logs and the error envelope.
    pub fn stage(&self) -> &'static str {
        match self {
            ExtractError::InsufficientText { .. } => "reconstruction",
            ExtractError::Decode(_) => "decoding",
            ExtractError::Providers(_) => "completion",
            ExtractError::Structuring(_) => "structuring",
        }
    }
}

/// Structures already-reconstructed text into a profile: build the
/// structuring instruction, run a blocking completion through the fallback
/// chain, parse with the required-field schema, attach `raw_text`.
#[tracing::instrument(skip_all, fields(chars = raw_text.len()))]
pub async fn extract_profile(
    router: &ProviderRouter,
    raw_text: String,
) -> Result<CandidateProfile, ExtractError> {
    let prompt = prompts::STRUCTURING_PROMPT_TEMPLATE.replace("{resume_text}", &raw_text);
    let request = CompletionRequest::single_turn(prompts::STRUCTURING_SYSTEM, &prompt);

    let completion = router
        .complete_blocking(&request, ProviderPreference::default())
        .await?;

    let mut profile: CandidateProfile =
        structured::parse_as(&completion, REQUIRED_PROFILE_FIELDS)?;
    profile.raw_text = raw_text;

    info!(
        name = %profile.name,
        skills = profile.skills.len(),
        experience = profile.experience.len(),
        "profile extracted"
    );
    Ok(profile)
}

/// Extraction from the UI's positioned text-layer fragments. Reconstruction
/// fails fast on unreadable documents, before any provider is contacted.
pub async fn extract_from_fragments(
    router: &ProviderRouter,
    fragments: &[TextFragment],
) -> Result<CandidateProfile, ExtractError> {
    let text = reconstruct::reconstruct(fragments)?;
    extract_profile(router, text).await
}

/// Extraction from a raw PDF upload, decoded server-side. The decode is CPU
/// work, so it runs on the blocking pool.
pub async fn extract_from_pdf(
    router: &ProviderRouter,
    bytes: Vec<u8>,
) -> Result<CandidateProfile, ExtractError> {
    let text = tokio::task::spawn_blocking(move || reconstruct::text_from_pdf_bytes(&bytes))
        .await
        .map_err(|e| ExtractError::Decode(e.to_string()))??;
    extract_profile(router, text).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use futures_util::stream;

    use super::*;
    use crate::providers::{CompletionProvider, ProviderError, TextStream};

    struct CannedProvider {
        response: &'static str,
        calls: AtomicUsize,
    }

    impl CannedProvider {
        fn new(response: &'static str) -> Arc<Self> {
            Arc::new(CannedProvider {
                response,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate_blocking(
            &self,
            _request: &CompletionRequest,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.to_string())
        }

        async fn generate_streaming(
            &self,
            _request: &CompletionRequest,
        ) -> Result<TextStream, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::pin(stream::iter(vec![Ok(self.response.to_string())])))
        }
    }

    fn router_with(provider: Arc<CannedProvider>) -> ProviderRouter {
        ProviderRouter::new(vec![provider], Duration::from_secs(5))
    }

    const PROFILE_JSON: &str = r#"{
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "skills": ["Rust", "Compilers"],
        "experience": [{"company": "Analytical Engines", "position": "Engineer", "duration": "10y", "description": "built things"}],
        "education": []
    }"#;

    #[tokio::test]
    async fn test_extract_profile_attaches_raw_text() {
        let provider = CannedProvider::new(PROFILE_JSON);
        let router = router_with(provider.clone());
        let raw = "Ada Lovelace. Senior engineer. Rust, Compilers, a decade of experience."
            .to_string();

        let profile = extract_profile(&router, raw.clone()).await.unwrap();

        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.raw_text, raw);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fenced_model_output_still_structures() {
        let provider = CannedProvider::new(
            "```json\n{\"name\":\"B\",\"skills\":[],\"experience\":[],\"education\":[]}\n```",
        );
        let router = router_with(provider);
        let profile = extract_profile(&router, "long enough raw text".to_string())
            .await
            .unwrap();
        assert_eq!(profile.name, "B");
        assert!(profile.skills.is_empty());
    }

    #[tokio::test]
    async fn test_missing_required_field_is_terminal() {
        let provider = CannedProvider::new(r#"{"name": "C", "skills": []}"#);
        let router = router_with(provider);
        let err = extract_profile(&router, "raw".to_string()).await.unwrap_err();
        assert_eq!(err.stage(), "structuring");
    }

    #[tokio::test]
    async fn test_short_fragments_fail_before_any_provider_call() {
        let provider = CannedProvider::new(PROFILE_JSON);
        let router = router_with(provider.clone());
        let fragments = vec![reconstruct::TextFragment {
            page: 1,
            y: 10.0,
            text: "ten chars!".to_string(),
        }];

        let err = extract_from_fragments(&router, &fragments).await.unwrap_err();

        assert_eq!(err.stage(), "reconstruction");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
