// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, permissive CORS (any origin; pre-flight OPTIONS answered
//! automatically), and shared state.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use leadflow_agent::ChatEngine;
use leadflow_core::LeadflowError;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The conversation orchestrator.
    pub engine: Arc<ChatEngine>,
    /// Process start time for uptime reporting.
    pub started: Instant,
}

/// Gateway server configuration (mirrors `GatewayConfig` from leadflow-config
/// to avoid a config-crate dependency here).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router. Exposed separately so tests can drive it
/// without binding a socket.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/chat", post(handlers::post_chat))
        .route("/v1/leads", get(handlers::get_leads))
        .route("/v1/conversations/{id}/turns", get(handlers::get_turns))
        .route(
            "/v1/conversations/{id}/engagement",
            get(handlers::get_engagement).post(handlers::post_engagement),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until the task is aborted.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), LeadflowError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LeadflowError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| LeadflowError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug_shows_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8787,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(debug.contains("8787"));
    }
}
