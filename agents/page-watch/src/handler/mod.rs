//! Keep-alive HTTP endpoint
//!
//! Hosting platforms ping this to decide the process is alive. It shares
//! nothing with the poll loop.

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Body of the root route
pub const ALIVE_BODY: &str = "Bot is alive!";

pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Create the router
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(alive))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}

/// Serve the router until the listener fails
pub async fn serve(listener: tokio::net::TcpListener) -> std::io::Result<()> {
    axum::serve(listener, create_router()).await
}

async fn alive() -> &'static str {
    ALIVE_BODY
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
