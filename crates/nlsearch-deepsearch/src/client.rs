// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Sourcegraph Deep Search conversation API.
//!
//! [`DeepSearchClient`] creates conversations, reads them back, and polls a
//! conversation until its latest question reaches a terminal status.

use std::time::Duration;

use nlsearch_config::DeepSearchConfig;
use nlsearch_core::NlsearchError;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::types::{Conversation, CreateConversationRequest, Question, QuestionStatus};

/// Path of the conversation collection, relative to the instance origin.
const API_PATH: &str = "/.api/deepsearch/v1";

/// Header carrying the client identifier.
const CLIENT_ID_HEADER: &str = "x-requested-with";

/// Default interval between conversation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default per-call transport timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Deep Search conversation API.
///
/// Holds only static configuration and a pooled transport, so one instance
/// can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct DeepSearchClient {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

/// What a single poll observed.
#[derive(Debug)]
enum PollState {
    Pending,
    Completed(Question),
    Failed,
    Cancelled,
}

impl PollState {
    /// Classifies a conversation snapshot by its most recent question.
    fn observe(conversation: Conversation) -> Self {
        match conversation.questions.into_iter().next_back() {
            None => Self::Pending,
            Some(question) => match question.status {
                QuestionStatus::Completed => Self::Completed(question),
                QuestionStatus::Failed => Self::Failed,
                QuestionStatus::Cancelled => Self::Cancelled,
                QuestionStatus::InProgress(_) => Self::Pending,
            },
        }
    }
}

impl DeepSearchClient {
    /// Creates a client for the instance at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Instance origin; trailing slashes are ignored
    /// * `access_token` - Sent as `Authorization: token <access_token>`
    /// * `client_identifier` - Sent as `X-Requested-With`
    /// * `http_timeout` - Upper bound for each individual HTTP call
    pub fn new(
        base_url: &str,
        access_token: &str,
        client_identifier: &str,
        http_timeout: Duration,
    ) -> Result<Self, NlsearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("token {access_token}")).map_err(|e| {
            NlsearchError::Config(format!("invalid access token header value: {e}"))
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        headers.insert(
            CLIENT_ID_HEADER,
            HeaderValue::from_str(client_identifier).map_err(|e| {
                NlsearchError::Config(format!("invalid client identifier header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(http_timeout)
            .build()
            .map_err(|e| NlsearchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Creates a client from the `[deepsearch]` config section.
    ///
    /// Fails if the access token is missing or the base URL has no host.
    pub fn from_config(config: &DeepSearchConfig) -> Result<Self, NlsearchError> {
        let client = Self::new(
            &config.origin()?,
            config.require_token()?,
            &config.client_identifier,
            config.http_timeout(),
        )?;
        Ok(client.with_poll_interval(config.poll_interval()))
    }

    /// Overrides the interval between conversation polls.
    ///
    /// A zero interval falls back to [`DEFAULT_POLL_INTERVAL`].
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Starts a conversation whose first question is `question`.
    ///
    /// Blank input is not rejected here. A single attempt is made; both 200
    /// and 202 count as success.
    pub async fn create_conversation(&self, question: &str) -> Result<Conversation, NlsearchError> {
        let url = format!("{}{API_PATH}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CreateConversationRequest { question })
            .send()
            .await
            .map_err(|e| NlsearchError::transport("send request", e))?;

        let conversation: Conversation =
            decode_response(response, &[StatusCode::OK, StatusCode::ACCEPTED]).await?;
        info!(
            conversation_id = conversation.id,
            questions = conversation.questions.len(),
            "deep search conversation created"
        );
        Ok(conversation)
    }

    /// Reads the current state of conversation `conversation_id`.
    ///
    /// A single attempt is made; only 200 counts as success.
    pub async fn get_conversation(&self, conversation_id: i64) -> Result<Conversation, NlsearchError> {
        let url = format!("{}{API_PATH}/{conversation_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NlsearchError::transport("send request", e))?;

        decode_response(response, &[StatusCode::OK]).await
    }

    /// Polls conversation `conversation_id` until its latest question is terminal.
    ///
    /// The first poll happens one interval after the call. Each tick checks
    /// the deadline before polling, so a timeout is reported at most one
    /// interval after `max_wait`. Cancellation is checked before every wait
    /// and raced against both the tick and the in-flight poll. Errors from a
    /// poll abort immediately.
    pub async fn wait_for_completion(
        &self,
        conversation_id: i64,
        max_wait: Duration,
        cancel: &CancellationToken,
    ) -> Result<Question, NlsearchError> {
        let start = Instant::now();
        let deadline = start + max_wait;
        let mut ticker = tokio::time::interval_at(start + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if cancel.is_cancelled() {
                return Err(NlsearchError::Cancelled);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(conversation_id, "wait cancelled by caller");
                    return Err(NlsearchError::Cancelled);
                }
                _ = ticker.tick() => {}
            }

            if Instant::now() > deadline {
                warn!(conversation_id, ?max_wait, "timed out waiting for deep search answer");
                return Err(NlsearchError::Timeout { duration: max_wait });
            }

            let conversation = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(conversation_id, "poll abandoned, cancelled by caller");
                    return Err(NlsearchError::Cancelled);
                }
                result = self.get_conversation(conversation_id) => result?,
            };
            match PollState::observe(conversation) {
                PollState::Pending => {
                    debug!(conversation_id, elapsed = ?start.elapsed(), "question still pending");
                }
                PollState::Completed(question) => {
                    info!(
                        conversation_id,
                        question_id = question.id,
                        elapsed = ?start.elapsed(),
                        "deep search question completed"
                    );
                    return Ok(question);
                }
                PollState::Failed => {
                    warn!(conversation_id, "deep search question failed");
                    return Err(NlsearchError::QuestionFailed);
                }
                PollState::Cancelled => {
                    warn!(conversation_id, "deep search question was cancelled upstream");
                    return Err(NlsearchError::QuestionCancelled);
                }
            }
        }
    }
}

/// Checks the status against `accepted` and decodes the JSON body.
///
/// Rejected responses keep their status and raw body for diagnostics.
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    accepted: &[StatusCode],
) -> Result<T, NlsearchError> {
    let status = response.status();
    debug!(status = %status, url = %response.url(), "deep search response received");

    if !accepted.contains(&status) {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = %status, error = %e, "failed to read error response body");
                String::new()
            }
        };
        return Err(NlsearchError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| NlsearchError::transport("read response body", e))?;
    serde_json::from_str(&body).map_err(|e| NlsearchError::decode("decode response", e))
}
