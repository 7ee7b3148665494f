use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only: nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    /// The hosted model. Default: `LlmClient` (Gemini). Tests inject a stub.
    pub model: Arc<dyn GenerativeModel>,
    pub config: Config,
}
