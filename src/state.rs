//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool, the optional LLM client and the parsed server
//! config. Canvases are stored as opaque JSON, so nothing else is cached here.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::llm::LlmChat;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, llm: Option<Arc<dyn LlmChat>>, config: ServerConfig) -> Self {
        Self { pool, llm, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
