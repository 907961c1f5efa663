// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A wiremock-backed Deep Search upstream.

use std::time::Duration;

use nlsearch_config::DeepSearchConfig;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Collection path of the Deep Search API.
pub const CONVERSATIONS_PATH: &str = "/.api/deepsearch/v1";

/// Access token configured for clients talking to the mock.
pub const TEST_TOKEN: &str = "sgp_test_token";

/// Mock Sourcegraph instance serving the Deep Search endpoints.
pub struct MockDeepSearch {
    server: MockServer,
}

impl MockDeepSearch {
    /// Starts a mock server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URI of the mock, e.g. `http://127.0.0.1:54321`.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// The underlying wiremock server, for custom expectations.
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Client configuration pointed at this mock with a short poll interval.
    pub fn config(&self, poll_interval: Duration) -> DeepSearchConfig {
        DeepSearchConfig {
            base_url: self.uri(),
            access_token: Some(TEST_TOKEN.to_string()),
            poll_interval_ms: poll_interval.as_millis() as u64,
            ..Default::default()
        }
    }

    /// Answers every creation request with `status` and a JSON body.
    pub async fn respond_to_create(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(CONVERSATIONS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answers every creation request with `status` and a raw text body.
    pub async fn fail_create(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(CONVERSATIONS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Serves `snapshots` to successive reads of conversation `id`, in order.
    ///
    /// The last snapshot keeps being served once the others are used up.
    pub async fn respond_to_polls(&self, id: i64, snapshots: Vec<Value>) {
        let conversation_path = format!("{CONVERSATIONS_PATH}/{id}");
        let count = snapshots.len();
        for (i, snapshot) in snapshots.into_iter().enumerate() {
            let mock = Mock::given(method("GET"))
                .and(path(conversation_path.as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(snapshot));
            let mock = if i + 1 < count {
                mock.up_to_n_times(1)
            } else {
                mock
            };
            mock.mount(&self.server).await;
        }
    }

    /// Answers every read of conversation `id` with `status` and a raw body.
    pub async fn fail_polls(&self, id: i64, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{CONVERSATIONS_PATH}/{id}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Number of conversation reads received so far.
    pub async fn poll_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == "GET")
            .count()
    }
}
