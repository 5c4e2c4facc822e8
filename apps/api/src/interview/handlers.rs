use axum::body::Body;
use axum::extract::{Json, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::interview::{build_system_prompt, Difficulty};
use crate::models::chat::ConversationMessage;
use crate::models::profile::CandidateProfile;
use crate::providers::router::ProviderPreference;
use crate::providers::{ChatMessage, CompletionRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    #[serde(default)]
    pub history: Vec<ConversationMessage>,
    pub profile: Option<CandidateProfile>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub provider_preference: ProviderPreference,
}

/// POST /api/v1/interview
///
/// Streams the interviewer's next turn as raw text chunks — no framing, the
/// client reconstructs the reply by concatenation. 400 when no profile is
/// supplied; 502 when every provider fails before delivery begins.
pub async fn handle_interview(
    State(state): State<AppState>,
    Json(req): Json<InterviewRequest>,
) -> Result<Response, AppError> {
    let profile = req
        .profile
        .ok_or_else(|| AppError::Validation("profile is required".to_string()))?;

    let system = build_system_prompt(&profile, req.difficulty);

    let mut history = req.history;
    if history.is_empty() {
        // First turn of a session: the UI sends an empty log and expects
        // the interviewer to open.
        history.push(ConversationMessage::user("Please begin the interview."));
    }

    info!(
        candidate = %profile.name,
        turns = history.len(),
        difficulty = ?req.difficulty,
        "starting interview turn"
    );

    let messages: Vec<ChatMessage> = history
        .iter()
        .map(|m| ChatMessage {
            role: m.role.as_str(),
            content: m.content.clone(),
        })
        .collect();

    let request = CompletionRequest::new(system, messages);
    let stream = state
        .router
        .complete_streaming(&request, req.provider_preference)
        .await?;

    let body = Body::from_stream(stream.map(|chunk| chunk.map(Bytes::from)));
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}
