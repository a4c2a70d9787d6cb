pub mod documents;
pub mod health;
pub mod interviews;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/interviews/generate",
            post(interviews::handle_generate),
        )
        .route(
            "/api/v1/interviews/generate/batch",
            post(interviews::handle_generate_batch),
        )
        .route(
            "/api/v1/documents/extract",
            post(documents::handle_extract),
        )
        .with_state(state)
}
