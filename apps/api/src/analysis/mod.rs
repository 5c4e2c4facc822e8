//! Best-effort profile analysis. This pipeline never fails visibly: when
//! no provider is reachable or the output does not parse, the caller gets
//! the labeled baseline `AnalysisResult` instead of an error.

use axum::extract::{Json, State};
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::models::profile::{AnalysisResult, CandidateProfile};
use crate::providers::router::{ProviderPreference, ProviderRouter};
use crate::providers::CompletionRequest;
use crate::state::AppState;
use crate::structured;

pub mod prompts;

/// Top-level fields the analysis completion must produce (camelCase wire).
pub const REQUIRED_ANALYSIS_FIELDS: &[&str] = &[
    "overallScore",
    "skillsScore",
    "experienceScore",
    "educationScore",
];

#[tracing::instrument(skip_all, fields(candidate = %profile.name))]
pub async fn analyze_profile(
    router: &ProviderRouter,
    profile: &CandidateProfile,
) -> AnalysisResult {
    let profile_json = match serde_json::to_string_pretty(profile) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "profile not serializable, using baseline analysis");
            return AnalysisResult::fallback(profile);
        }
    };
    let prompt = prompts::ANALYSIS_PROMPT_TEMPLATE.replace("{profile_json}", &profile_json);
    let request = CompletionRequest::single_turn(prompts::ANALYSIS_SYSTEM, &prompt);

    let completion = match router
        .complete_blocking(&request, ProviderPreference::default())
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "analysis completion unavailable, using baseline");
            return AnalysisResult::fallback(profile);
        }
    };

    match structured::parse_as::<AnalysisResult>(&completion, REQUIRED_ANALYSIS_FIELDS) {
        Ok(result) => result.clamped(),
        Err(e) => {
            warn!(error = %e, "analysis output unparseable, using baseline");
            AnalysisResult::fallback(profile)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub profile: Option<CandidateProfile>,
}

/// POST /api/v1/analysis — always 200 with a result, degraded default
/// included. 400 only when the profile is absent.
pub async fn handle_analysis(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let profile = req
        .profile
        .ok_or_else(|| AppError::Validation("profile is required".to_string()))?;
    Ok(Json(analyze_profile(&state.router, &profile).await))
}
