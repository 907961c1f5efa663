// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::time::Duration;

use nlsearch_core::NlsearchError;
use serde::{Deserialize, Serialize};

/// Top-level nlsearch configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NlsearchConfig {
    /// Upstream Deep Search API settings.
    #[serde(default)]
    pub deepsearch: DeepSearchConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Upstream Deep Search API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeepSearchConfig {
    /// Address of the Sourcegraph instance. Only scheme and host are used.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Access token sent as `Authorization: token <value>`. Required.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Value of the `X-Requested-With` header.
    #[serde(default = "default_client_identifier")]
    pub client_identifier: String,

    /// Per-call transport timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Interval between conversation polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for DeepSearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            client_identifier: default_client_identifier(),
            http_timeout_secs: default_http_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl std::fmt::Debug for DeepSearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepSearchConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("client_identifier", &self.client_identifier)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

impl DeepSearchConfig {
    /// Returns `scheme://host[:port]` of the configured base URL.
    ///
    /// Any path, query or fragment is dropped.
    pub fn origin(&self) -> Result<String, NlsearchError> {
        let parsed = url::Url::parse(self.base_url.trim()).map_err(|e| {
            NlsearchError::Config(format!(
                "deepsearch.base_url `{}` is not a valid URL: {e}",
                self.base_url
            ))
        })?;
        let host = parsed.host_str().ok_or_else(|| {
            NlsearchError::Config(format!(
                "deepsearch.base_url `{}` has no host",
                self.base_url
            ))
        })?;
        Ok(match parsed.port() {
            Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
            None => format!("{}://{host}", parsed.scheme()),
        })
    }

    /// Returns the configured access token, rejecting a missing or blank one.
    pub fn require_token(&self) -> Result<&str, NlsearchError> {
        match self.access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(NlsearchError::Config(
                "deepsearch.access_token is required (set SOURCEGRAPH_TOKEN)".into(),
            )),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_base_url() -> String {
    "https://sourcegraph.com".to_string()
}

fn default_client_identifier() -> String {
    "nlsearch-app 1.0.0".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for every path that is not an API route.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Total budget for creating a conversation and waiting for its answer.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_base_url(url: &str) -> DeepSearchConfig {
        DeepSearchConfig {
            base_url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn origin_strips_path_and_trailing_slash() {
        let cfg = with_base_url("https://sourcegraph.example.com/search?q=x");
        assert_eq!(cfg.origin().unwrap(), "https://sourcegraph.example.com");

        let cfg = with_base_url("https://sourcegraph.com/");
        assert_eq!(cfg.origin().unwrap(), "https://sourcegraph.com");
    }

    #[test]
    fn origin_keeps_explicit_port() {
        let cfg = with_base_url("http://localhost:3080/.api");
        assert_eq!(cfg.origin().unwrap(), "http://localhost:3080");
    }

    #[test]
    fn origin_rejects_garbage() {
        let cfg = with_base_url("not a url");
        assert!(matches!(cfg.origin(), Err(NlsearchError::Config(_))));
    }

    #[test]
    fn require_token_rejects_blank() {
        let mut cfg = DeepSearchConfig::default();
        assert!(cfg.require_token().is_err());
        cfg.access_token = Some("   ".into());
        assert!(cfg.require_token().is_err());
        cfg.access_token = Some("sgp_abc".into());
        assert_eq!(cfg.require_token().unwrap(), "sgp_abc");
    }

    #[test]
    fn debug_redacts_access_token() {
        let cfg = DeepSearchConfig {
            access_token: Some("sgp_supersecret".into()),
            ..Default::default()
        };
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("sgp_supersecret"));
        assert!(debug.contains("[redacted]"));
    }
}
