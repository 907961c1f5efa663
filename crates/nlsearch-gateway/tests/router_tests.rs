// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests for the gateway against a mock Deep Search.

use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::Router;
use nlsearch_deepsearch::DeepSearchClient;
use nlsearch_gateway::{GatewayState, build_router};
use nlsearch_test_utils::{MockDeepSearch, fixtures};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

const FAST_POLL: Duration = Duration::from_millis(50);

fn router(mock: &MockDeepSearch, timeout: Duration, static_dir: &str) -> Router {
    let client = DeepSearchClient::from_config(&mock.config(FAST_POLL)).unwrap();
    build_router(
        GatewayState::new(client, timeout, CancellationToken::new()),
        static_dir,
    )
}

fn query_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn query_returns_extracted_answer_and_sources() {
    let mock = MockDeepSearch::start().await;
    mock.respond_to_create(200, fixtures::pending_conversation(1)).await;
    mock.respond_to_polls(
        1,
        vec![
            fixtures::pending_conversation(1),
            fixtures::conversation(
                1,
                vec![fixtures::completed_question(
                    10,
                    1,
                    "For this request, use:\n`repo:sourcegraph/sourcegraph lang:go func Parse`",
                    vec![fixtures::source("github.com/sourcegraph/sourcegraph", "internal/search/query/parser.go")],
                )],
            ),
        ],
    )
    .await;

    let response = router(&mock, Duration::from_secs(10), "frontend")
        .oneshot(query_request(r#"{"query": "the Parse function in sourcegraph go code"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["answer"], "repo:sourcegraph/sourcegraph lang:go func Parse");
    assert_eq!(body["sources"][0]["path"], "internal/search/query/parser.go");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let mock = MockDeepSearch::start().await;
    let response = router(&mock, Duration::from_secs(5), "frontend")
        .oneshot(query_request("{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "invalid request body");
}

#[tokio::test]
async fn empty_query_is_rejected_without_upstream_calls() {
    let mock = MockDeepSearch::start().await;
    let response = router(&mock, Duration::from_secs(5), "frontend")
        .oneshot(query_request(r#"{"query": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "query is required");
    assert!(mock.server().received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn upstream_rejection_is_reported_verbatim() {
    let mock = MockDeepSearch::start().await;
    mock.fail_create(401, "Invalid access token.").await;

    let response = router(&mock, Duration::from_secs(5), "frontend")
        .oneshot(query_request(r#"{"query": "anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert_eq!(
        error,
        "failed to create conversation: unexpected status 401: Invalid access token."
    );
}

#[tokio::test]
async fn failed_question_is_bad_gateway() {
    let mock = MockDeepSearch::start().await;
    mock.respond_to_create(200, fixtures::pending_conversation(2)).await;
    mock.respond_to_polls(2, vec![fixtures::conversation(2, vec![fixtures::question(20, 2, "failed")])])
        .await;

    let response = router(&mock, Duration::from_secs(5), "frontend")
        .oneshot(query_request(r#"{"query": "anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await["error"],
        "failed to get response: question processing failed"
    );
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let mock = MockDeepSearch::start().await;
    mock.respond_to_create(200, fixtures::pending_conversation(3)).await;
    mock.respond_to_polls(3, vec![fixtures::pending_conversation(3)]).await;

    let response = router(&mock, Duration::from_millis(300), "frontend")
        .oneshot(query_request(r#"{"query": "anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("timeout waiting for response"), "got: {error}");
}

#[tokio::test]
async fn shutdown_cancels_in_flight_queries() {
    let mock = MockDeepSearch::start().await;
    mock.respond_to_create(200, fixtures::pending_conversation(4)).await;
    mock.respond_to_polls(4, vec![fixtures::pending_conversation(4)]).await;

    let shutdown = CancellationToken::new();
    let client = DeepSearchClient::from_config(&mock.config(FAST_POLL)).unwrap();
    let app = build_router(
        GatewayState::new(client, Duration::from_secs(30), shutdown.clone()),
        "frontend",
    );

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let response = app
        .oneshot(query_request(r#"{"query": "anything"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("cancelled by caller"), "got: {error}");
}

#[tokio::test]
async fn health_does_not_touch_upstream() {
    let mock = MockDeepSearch::start().await;
    let response = router(&mock, Duration::from_secs(5), "frontend")
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
    assert!(mock.server().received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_on_query_route_is_not_allowed() {
    let mock = MockDeepSearch::start().await;
    let response = router(&mock, Duration::from_secs(5), "frontend")
        .oneshot(Request::builder().uri("/api/query").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let mock = MockDeepSearch::start().await;
    let response = router(&mock, Duration::from_secs(5), "frontend")
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/query")
                .header(header::ORIGIN, "http://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn static_frontend_is_served() {
    let mock = MockDeepSearch::start().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>nlsearch</h1>").unwrap();

    let response = router(&mock, Duration::from_secs(5), dir.path().to_str().unwrap())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>nlsearch</h1>");
}
