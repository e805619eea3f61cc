mod config;
mod db;
mod error;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::llm::LlmChat;

#[tokio::main]
async fn main() {
    // Load .env before the subscriber so RUST_LOG may come from it.
    let dotenv = config::DotenvStatus::from_result(dotenvy::dotenv());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    dotenv.log();

    let config = config::ServerConfig::from_env().expect("invalid server config");
    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    // Initialize LLM client (non-fatal: generation disabled if config missing).
    let llm: Option<Arc<dyn LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; /generate disabled");
            None
        }
    };

    let port = config.port;
    let state = state::AppState::new(pool, llm, config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "sketchboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
