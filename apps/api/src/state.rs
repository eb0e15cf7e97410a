use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::submission::store::SubmissionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Ordered Gemini fallback chain in production.
    pub generator: Arc<dyn TextGenerator>,
    /// Opens one database connection per save.
    pub store: Arc<dyn SubmissionStore>,
}
