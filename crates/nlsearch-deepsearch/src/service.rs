// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language to search-query translation on top of the client.

use std::time::Duration;

use nlsearch_core::NlsearchError;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::client::DeepSearchClient;
use crate::extract::extract_query;
use crate::prompt::build_search_prompt;
use crate::types::JsonObject;

/// Total budget for creating a conversation and waiting for its answer.
pub const DEFAULT_QUERY_BUDGET: Duration = Duration::from_secs(60);

/// A translated query and the sources Deep Search consulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    pub answer: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<JsonObject>,
}

/// Which half of a translation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Create,
    Wait,
}

/// A translation failure together with the stage it happened in.
#[derive(Debug)]
pub struct QueryError {
    pub stage: QueryStage,
    pub error: NlsearchError,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stage {
            QueryStage::Create => write!(f, "failed to create conversation: {}", self.error),
            QueryStage::Wait => write!(f, "failed to get response: {}", self.error),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Translates `request` into a search query.
///
/// Blank requests are rejected before any network call. Conversation creation
/// and the wait for its answer share one `budget`; running past it yields
/// [`NlsearchError::Timeout`], while `cancel` firing yields
/// [`NlsearchError::Cancelled`].
pub async fn submit_query(
    client: &DeepSearchClient,
    request: &str,
    budget: Duration,
    cancel: &CancellationToken,
) -> Result<QueryAnswer, QueryError> {
    if request.trim().is_empty() {
        return Err(QueryError {
            stage: QueryStage::Create,
            error: NlsearchError::InvalidInput("query is required".into()),
        });
    }

    match tokio::time::timeout(budget, translate(client, request, budget, cancel)).await {
        Ok(result) => result,
        Err(_) => {
            error!(?budget, "query translation exceeded its budget");
            Err(QueryError {
                stage: QueryStage::Wait,
                error: NlsearchError::Timeout { duration: budget },
            })
        }
    }
}

async fn translate(
    client: &DeepSearchClient,
    request: &str,
    budget: Duration,
    cancel: &CancellationToken,
) -> Result<QueryAnswer, QueryError> {
    let prompt = build_search_prompt(request);

    let conversation = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(NlsearchError::Cancelled),
        result = client.create_conversation(&prompt) => result,
    }
    .map_err(|error| {
        error!(error = %error, "error creating conversation");
        QueryError {
            stage: QueryStage::Create,
            error,
        }
    })?;

    let question = client
        .wait_for_completion(conversation.id, budget, cancel)
        .await
        .map_err(|error| {
            error!(conversation_id = conversation.id, error = %error, "error waiting for completion");
            QueryError {
                stage: QueryStage::Wait,
                error,
            }
        })?;

    let answer = extract_query(question.answer.as_deref().unwrap_or_default());
    info!(conversation_id = conversation.id, answer = %answer, "query translated");
    Ok(QueryAnswer {
        answer,
        sources: question.sources,
    })
}
