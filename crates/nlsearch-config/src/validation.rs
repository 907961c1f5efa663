// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::NlsearchConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &NlsearchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.deepsearch.require_token().is_err() {
        errors.push(ConfigError::MissingKey {
            key: "deepsearch.access_token".to_string(),
        });
    }

    match url::Url::parse(config.deepsearch.base_url.trim()) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "deepsearch.base_url must use http or https, got `{}`",
                        parsed.scheme()
                    ),
                });
            }
            if parsed.host_str().is_none() {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "deepsearch.base_url `{}` has no host",
                        config.deepsearch.base_url
                    ),
                });
            }
        }
        Err(e) => errors.push(ConfigError::Validation {
            message: format!(
                "deepsearch.base_url `{}` is not a valid URL: {e}",
                config.deepsearch.base_url
            ),
        }),
    }

    if config.deepsearch.client_identifier.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "deepsearch.client_identifier must not be empty".to_string(),
        });
    }

    if config.deepsearch.http_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "deepsearch.http_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.deepsearch.poll_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "deepsearch.poll_interval_ms must be greater than 0".to_string(),
        });
    }

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "server.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
