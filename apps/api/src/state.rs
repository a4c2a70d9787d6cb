use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::coordinator::InterviewCoordinator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<InterviewCoordinator>,
    /// Kept for handlers that need deployment settings (rate limits, model name).
    #[allow(dead_code)]
    pub config: Config,
}
