// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nlsearch serve` command implementation.
//!
//! Builds the Deep Search client once, then serves the gateway until a
//! shutdown signal arrives.

use nlsearch_config::NlsearchConfig;
use nlsearch_core::NlsearchError;
use nlsearch_deepsearch::DeepSearchClient;
use nlsearch_gateway::{GatewayState, start_server};
use tracing::info;

use crate::shutdown;

/// Runs the `nlsearch serve` command.
pub async fn run_serve(config: NlsearchConfig) -> Result<(), NlsearchError> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        upstream = %config.deepsearch.base_url,
        "starting nlsearch serve"
    );

    let client = DeepSearchClient::from_config(&config.deepsearch)?;
    let cancel = shutdown::install_signal_handler();
    let state = GatewayState::new(client, config.server.request_timeout(), cancel);

    start_server(&config.server, state).await
}
