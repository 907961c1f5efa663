// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for nlsearch.
//!
//! TOML files and environment variables are merged with Figment, checked
//! against `deny_unknown_fields` structs, validated semantically and reported
//! through miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use nlsearch_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("listening on port {}", config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{DeepSearchConfig, LogConfig, NlsearchConfig, ServerConfig};

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<NlsearchConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from a specific file (plus environment) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<NlsearchConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<NlsearchConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<NlsearchConfig, figment::Error>,
) -> Result<NlsearchConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
