use std::sync::Arc;

use crate::jobs::JobSearch;
use crate::llm_client::TextGenerator;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Gemini in production; any `TextGenerator` in tests.
    pub llm: Arc<dyn TextGenerator>,
    /// JSearch in production; any `JobSearch` in tests.
    pub job_search: Arc<dyn JobSearch>,
    pub sessions: SessionStore,
    pub max_upload_bytes: usize,
}
