#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::providers::router::AllProvidersFailed;

/// Application-level error type for the chat and analysis endpoints.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Extraction speaks its own success/failure envelope and does not use this.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Providers(#[from] AllProvidersFailed),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::Providers(e) => {
                // Diagnostic detail stays in the logs; the client gets a
                // generic retryable message.
                tracing::error!(attempted = ?e.attempted, "all completion providers failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "all_providers_failed",
                    "Text generation is temporarily unavailable. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error,
            "details": details
        }));

        (status, body).into_response()
    }
}
