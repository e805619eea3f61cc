//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend is small: share/load of whole canvases and the generation
//! proxy. Everything is JSON over HTTP under one Axum router with permissive
//! CORS, since the editor may be served from any origin.

pub mod canvases;
pub mod generate;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route("/", post(canvases::create))
        .route("/generate", post(generate::generate))
        .route("/healthz", get(healthz))
        .route("/{id}", get(canvases::load))
        .layer(body_limit)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
