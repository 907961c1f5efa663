// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles POST /api/query and GET /health.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nlsearch_core::NlsearchError;
use nlsearch_deepsearch::{QueryAnswer, submit_query};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info_span, warn};

use crate::server::GatewayState;

/// Request body for POST /api/query.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Natural-language description of the search.
    pub query: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// Maps a translation failure to the HTTP status reported to the caller.
pub fn status_for(error: &NlsearchError) -> StatusCode {
    match error {
        NlsearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        NlsearchError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        NlsearchError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        NlsearchError::Transport { .. }
        | NlsearchError::UnexpectedStatus { .. }
        | NlsearchError::Decode { .. }
        | NlsearchError::QuestionFailed
        | NlsearchError::QuestionCancelled => StatusCode::BAD_GATEWAY,
        NlsearchError::Config(_) | NlsearchError::Server { .. } | NlsearchError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// POST /api/query
///
/// Translates the natural-language `query` into a Sourcegraph search query.
pub async fn post_query(
    State(state): State<GatewayState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "rejected query request body");
            return error_response(StatusCode::BAD_REQUEST, "invalid request body".to_string());
        }
    };

    if body.query.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "query is required".to_string());
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let cancel = state.shutdown.child_token();
    let result = submit_query(&state.client, &body.query, state.request_timeout, &cancel)
        .instrument(info_span!("query", %request_id))
        .await;

    match result {
        Ok(answer) => (StatusCode::OK, Json::<QueryAnswer>(answer)).into_response(),
        Err(err) => error_response(status_for(&err.error), err.to_string()),
    }
}

/// GET /health
///
/// Liveness probe; never touches the Deep Search client.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}
