// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for nlsearch.
//!
//! Serves `POST /api/query` (natural language in, search query out),
//! `GET /health`, and the static frontend for every other path.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, HealthState, build_router, start_server};
