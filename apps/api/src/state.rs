use std::sync::Arc;

use crate::config::Config;
use crate::controller::AnalysisController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns the submission state machine and the provider behind it.
    pub controller: Arc<AnalysisController>,
}
