// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy `./medibot.toml` > `~/.config/medibot/medibot.toml`
//! > `/etc/medibot/medibot.toml` with `MEDIBOT_` environment overrides.

// figment::Error is external and large.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MedibotConfig;

/// Config sections, used to turn `MEDIBOT_GATEWAY_API_URL` into `gateway.api_url`.
const SECTIONS: &[&str] = &[
    "server",
    "gateway",
    "rag",
    "embedding",
    "vector",
    "completion",
    "storage",
    "handler",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/medibot/medibot.toml`
/// 3. `~/.config/medibot/medibot.toml`
/// 4. `./medibot.toml`
/// 5. `MEDIBOT_*` environment variables (including those from `./.env`)
pub fn load_config() -> Result<MedibotConfig, figment::Error> {
    load_dotenv();
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MedibotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MedibotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MedibotConfig, figment::Error> {
    load_dotenv();
    Figment::new()
        .merge(Serialized::defaults(MedibotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Default config files, lowest precedence first.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/medibot/medibot.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("medibot").join("medibot.toml"));
    }
    paths.push(PathBuf::from("medibot.toml"));
    paths
}

/// The merged provider chain, before extraction.
pub fn build_figment() -> Figment {
    default_config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(MedibotConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Read `./.env` into the process environment if it exists.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env file"),
    }
}

/// Environment provider mapping `MEDIBOT_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `MEDIBOT_GATEWAY_TIMEOUT_SECS` maps to `gateway.timeout_secs`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("MEDIBOT_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("gateway_api_url"), "gateway.api_url");
        assert_eq!(map_env_key("gateway_timeout_secs"), "gateway.timeout_secs");
        assert_eq!(map_env_key("storage_database_url"), "storage.database_url");
        assert_eq!(map_env_key("rag_top_k"), "rag.top_k");
        assert_eq!(map_env_key("handler_reject_non_medical"), "handler.reject_non_medical");
    }

    #[test]
    fn unknown_prefix_is_left_alone() {
        assert_eq!(map_env_key("unrelated_key"), "unrelated_key");
    }

    #[test]
    fn env_provider_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MEDIBOT_GATEWAY_TOKEN", "from-env");
            jail.set_env("MEDIBOT_SERVER_PORT", "9090");
            let config: MedibotConfig = Figment::new()
                .merge(Serialized::defaults(MedibotConfig::default()))
                .merge(Toml::string("[gateway]\ntoken = \"from-toml\"\n"))
                .merge(env_provider())
                .extract()?;
            let token = config.gateway.token.as_ref().map(|t| t.expose_secret());
            assert_eq!(token, Some("from-env"));
            assert_eq!(config.server.port, 9090);
            Ok(())
        });
    }
}
