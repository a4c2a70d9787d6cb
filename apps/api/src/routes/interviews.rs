//! Interview generation endpoints.
//!
//! Validation failures are synchronous 400s; once a request passes
//! validation the pipeline always answers 200 with a well-formed package,
//! error-shaped if generation failed. Batch members are isolated: a bad
//! member yields an error-shaped package in its slot.

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::errors::AppError;
use crate::models::package::FinalInterviewPackage;
use crate::models::request::GenerationRequest;
use crate::state::AppState;

/// POST /api/v1/interviews/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<FinalInterviewPackage>, AppError> {
    request.validate()?;
    info!(
        role = %request.role,
        level = request.level.as_str(),
        round = request.round.number(),
        "Received interview generation request"
    );
    Ok(Json(state.coordinator.generate(&request).await))
}

/// POST /api/v1/interviews/generate/batch
pub async fn handle_generate_batch(
    State(state): State<AppState>,
    Json(requests): Json<Vec<GenerationRequest>>,
) -> Result<Json<Vec<FinalInterviewPackage>>, AppError> {
    if requests.is_empty() {
        return Err(AppError::Validation("batch must not be empty".to_string()));
    }
    info!(count = requests.len(), "Received batch generation request");
    Ok(Json(state.coordinator.generate_batch(&requests).await))
}
