// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for nlsearch.
//!
//! [`MockDeepSearch`] stands in for a Sourcegraph instance and serves the two
//! Deep Search endpoints; [`fixtures`] builds the JSON bodies it returns.

pub mod fixtures;
pub mod mock_upstream;

pub use mock_upstream::{CONVERSATIONS_PATH, MockDeepSearch, TEST_TOKEN};
