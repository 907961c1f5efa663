// SPDX-FileCopyrightText: 2026 nlsearch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./nlsearch.toml` > `~/.config/nlsearch/nlsearch.toml` >
//! `/etc/nlsearch/nlsearch.toml`, with `NLSEARCH_*` and the legacy
//! `SOURCEGRAPH_URL` / `SOURCEGRAPH_TOKEN` / `PORT` variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::NlsearchConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/nlsearch/nlsearch.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "nlsearch.toml";

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/nlsearch/nlsearch.toml`
/// 3. `~/.config/nlsearch/nlsearch.toml`
/// 4. `./nlsearch.toml`
/// 5. Legacy `SOURCEGRAPH_URL`, `SOURCEGRAPH_TOKEN`, `PORT`
/// 6. `NLSEARCH_*` environment variables
pub fn load_config() -> Result<NlsearchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<NlsearchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NlsearchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NlsearchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NlsearchConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(NlsearchConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// `~/.config/nlsearch/nlsearch.toml`, if a config dir exists on this platform.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nlsearch/nlsearch.toml"))
}

/// `NLSEARCH_*` variables, mapped section-first with `Env::map()`.
///
/// `Env::split("_")` would turn `NLSEARCH_DEEPSEARCH_ACCESS_TOKEN` into
/// `deepsearch.access.token`; only the first segment names a section.
fn env_provider() -> Env {
    Env::prefixed("NLSEARCH_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("deepsearch_", "deepsearch.", 1)
            .replacen("server_", "server.", 1)
            .replacen("log_", "log.", 1)
            .into()
    })
}

/// The unprefixed variables older deployments already set.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["SOURCEGRAPH_URL", "SOURCEGRAPH_TOKEN", "PORT"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "sourcegraph_url" => "deepsearch.base_url".into(),
            "sourcegraph_token" => "deepsearch.access_token".into(),
            "port" => "server.port".into(),
            other => other.to_string().into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn prefixed_env_maps_underscored_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("NLSEARCH_DEEPSEARCH_ACCESS_TOKEN", "sgp_env");
            jail.set_env("NLSEARCH_SERVER_REQUEST_TIMEOUT_SECS", "90");
            jail.set_env("NLSEARCH_LOG_LEVEL", "debug");

            let config: NlsearchConfig = build_figment().extract()?;
            assert_eq!(config.deepsearch.access_token.as_deref(), Some("sgp_env"));
            assert_eq!(config.server.request_timeout_secs, 90);
            assert_eq!(config.log.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn legacy_env_vars_are_honoured() {
        Jail::expect_with(|jail| {
            jail.set_env("SOURCEGRAPH_URL", "https://sg.example.com/path");
            jail.set_env("SOURCEGRAPH_TOKEN", "sgp_legacy");
            jail.set_env("PORT", "9090");

            let config: NlsearchConfig = build_figment().extract()?;
            assert_eq!(config.deepsearch.base_url, "https://sg.example.com/path");
            assert_eq!(
                config.deepsearch.access_token.as_deref(),
                Some("sgp_legacy")
            );
            assert_eq!(config.server.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_wins_over_legacy() {
        Jail::expect_with(|jail| {
            jail.set_env("SOURCEGRAPH_TOKEN", "legacy");
            jail.set_env("NLSEARCH_DEEPSEARCH_ACCESS_TOKEN", "prefixed");

            let config: NlsearchConfig = build_figment().extract()?;
            assert_eq!(config.deepsearch.access_token.as_deref(), Some("prefixed"));
            Ok(())
        });
    }

    #[test]
    fn local_file_is_read_from_working_directory() {
        Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_PATH,
                r#"
[server]
port = 3000
"#,
            )?;

            let config: NlsearchConfig = build_figment().extract()?;
            assert_eq!(config.server.port, 3000);
            Ok(())
        });
    }
}
