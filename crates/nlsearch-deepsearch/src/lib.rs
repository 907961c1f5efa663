// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sourcegraph Deep Search integration for nlsearch.
//!
//! [`DeepSearchClient`] drives the remote conversation lifecycle
//! (create, poll, terminal status) and [`extract_query`] isolates the
//! generated query from the free-form answer. [`submit_query`] ties both
//! together behind a single time budget.

pub mod client;
pub mod extract;
pub mod prompt;
pub mod service;
pub mod types;

pub use client::DeepSearchClient;
pub use extract::extract_query;
pub use prompt::build_search_prompt;
pub use service::{DEFAULT_QUERY_BUDGET, QueryAnswer, QueryError, QueryStage, submit_query};
pub use types::{Conversation, JsonObject, Question, QuestionStatus};
