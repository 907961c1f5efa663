// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for nlsearch.
//!
//! Holds the error taxonomy shared by the configuration layer, the Deep Search
//! client, the HTTP gateway and the binary.

pub mod error;

pub use error::NlsearchError;
