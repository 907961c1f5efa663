// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use nlsearch_config::ServerConfig;
use nlsearch_core::NlsearchError;
use nlsearch_deepsearch::DeepSearchClient;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Deep Search client shared by every request.
    pub client: Arc<DeepSearchClient>,
    /// Budget for conversation creation plus answer wait.
    pub request_timeout: Duration,
    /// Cancelled on shutdown; each request polls under a child token.
    pub shutdown: CancellationToken,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(client: DeepSearchClient, request_timeout: Duration, shutdown: CancellationToken) -> Self {
        Self {
            client: Arc::new(client),
            request_timeout,
            shutdown,
            health: HealthState {
                start_time: Instant::now(),
            },
        }
    }
}

/// Builds the gateway router.
///
/// - POST /api/query
/// - GET /health
/// - everything else from `static_dir`
pub fn build_router(state: GatewayState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/query", post(handlers::post_query))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds `host:port` and serves until `state.shutdown` is cancelled.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), NlsearchError> {
    let shutdown = state.shutdown.clone();
    let app = build_router(state, &config.static_dir);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NlsearchError::Server {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server listening on http://{addr}");
    tracing::info!(static_dir = %config.static_dir, "serving frontend");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| NlsearchError::Server {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server stopped");
    Ok(())
}
