// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nlsearch query` command: a one-shot translation printed to stdout.

use nlsearch_config::NlsearchConfig;
use nlsearch_core::NlsearchError;
use nlsearch_deepsearch::{DeepSearchClient, QueryAnswer, QueryError, QueryStage, submit_query};

use crate::shutdown;

/// Translates `text` and returns what should be printed on stdout.
///
/// With `json` the full answer (query plus sources) is rendered as JSON,
/// otherwise just the extracted query.
pub async fn run_query(config: &NlsearchConfig, text: &str, json: bool) -> Result<String, QueryError> {
    let client = DeepSearchClient::from_config(&config.deepsearch).map_err(|error| QueryError {
        stage: QueryStage::Create,
        error,
    })?;
    let cancel = shutdown::install_signal_handler();

    let result = submit_query(&client, text, config.server.request_timeout(), &cancel).await;
    cancel.cancel();

    render(&result?, json).map_err(|error| QueryError {
        stage: QueryStage::Wait,
        error,
    })
}

fn render(answer: &QueryAnswer, json: bool) -> Result<String, NlsearchError> {
    if json {
        serde_json::to_string_pretty(answer)
            .map_err(|e| NlsearchError::Internal(format!("failed to encode answer: {e}")))
    } else {
        Ok(answer.answer.clone())
    }
}
