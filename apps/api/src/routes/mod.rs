pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis;
use crate::extraction::handlers as extraction_handlers;
use crate::interview::handlers as interview_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/extract",
            post(extraction_handlers::handle_extract_upload),
        )
        .route(
            "/api/v1/extract/fragments",
            post(extraction_handlers::handle_extract_fragments),
        )
        .route(
            "/api/v1/interview",
            post(interview_handlers::handle_interview),
        )
        .route("/api/v1/analysis", post(analysis::handle_analysis))
        .with_state(state)
}
