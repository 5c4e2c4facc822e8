use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::extraction::reconstruct::TextFragment;
use crate::extraction::{extract_from_fragments, extract_from_pdf, ExtractError};
use crate::models::profile::CandidateProfile;
use crate::state::AppState;

/// The success/failure envelope the UI collaborator consumes.
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<CandidateProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    fn ok(profile: CandidateProfile) -> Self {
        ExtractResponse {
            success: true,
            profile: Some(profile),
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        ExtractResponse {
            success: false,
            profile: None,
            error: Some(message.into()),
        }
    }
}

fn status_for(err: &ExtractError) -> StatusCode {
    match err {
        ExtractError::InsufficientText { .. }
        | ExtractError::Decode(_)
        | ExtractError::Structuring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ExtractError::Providers(_) => StatusCode::BAD_GATEWAY,
    }
}

fn failure(err: ExtractError) -> (StatusCode, Json<ExtractResponse>) {
    warn!(stage = err.stage(), error = %err, "extraction failed");
    // Extraction errors carry a specific user-facing reason, unlike the
    // generic provider-failure message on the chat path.
    (status_for(&err), Json(ExtractResponse::failed(err.to_string())))
}

/// POST /api/v1/extract — multipart PDF upload.
pub async fn handle_extract_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ExtractResponse>) {
    let mut bytes: Option<Vec<u8>> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let is_file = matches!(field.name(), Some("file") | None);
                match field.bytes().await {
                    Ok(data) if is_file => bytes = Some(data.to_vec()),
                    Ok(_) => {}
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ExtractResponse::failed(format!("invalid upload: {e}"))),
                        );
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ExtractResponse::failed(format!("invalid multipart body: {e}"))),
                );
            }
        }
    }

    let Some(bytes) = bytes else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ExtractResponse::failed("no document uploaded")),
        );
    };

    match extract_from_pdf(&state.router, bytes).await {
        Ok(profile) => (StatusCode::OK, Json(ExtractResponse::ok(profile))),
        Err(e) => failure(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct FragmentPayload {
    pub fragments: Vec<TextFragment>,
}

/// POST /api/v1/extract/fragments — positioned text runs from the UI's
/// client-side PDF text layer.
pub async fn handle_extract_fragments(
    State(state): State<AppState>,
    Json(payload): Json<FragmentPayload>,
) -> (StatusCode, Json<ExtractResponse>) {
    match extract_from_fragments(&state.router, &payload.fragments).await {
        Ok(profile) => (StatusCode::OK, Json(ExtractResponse::ok(profile))),
        Err(e) => failure(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(ExtractResponse::ok(CandidateProfile {
            name: "A".into(),
            email: None,
            phone: None,
            summary: None,
            skills: vec![],
            experience: vec![],
            education: vec![],
            weaknesses: None,
            raw_text: "text".into(),
        }))
        .unwrap();
        assert_eq!(ok["success"], true);
        assert!(ok.get("error").is_none());

        let failed = serde_json::to_value(ExtractResponse::failed("nope")).unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["error"], "nope");
        assert!(failed.get("profile").is_none());
    }

    #[test]
    fn test_insufficient_text_maps_to_422_with_reason() {
        let err = ExtractError::InsufficientText { chars: 10, min: 50 };
        assert_eq!(status_for(&err), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("no extractable text"));
    }
}
