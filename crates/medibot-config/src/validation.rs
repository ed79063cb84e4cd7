// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Every collaborator credential the selected retrieval mode needs must be
//! present and non-empty. All problems are collected before returning.

use secrecy::{ExposeSecret, SecretString};

use crate::diagnostic::ConfigError;
use crate::model::{MedibotConfig, RagMode};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &MedibotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    require(&mut errors, "gateway.api_url", config.gateway.api_url.as_deref());
    require(&mut errors, "gateway.token", exposed(&config.gateway.token));
    require(
        &mut errors,
        "storage.database_url",
        config.storage.database_url.as_deref(),
    );

    match config.rag.mode {
        RagMode::Pipeline => {
            require(&mut errors, "embedding.api_key", exposed(&config.embedding.api_key));
            require(&mut errors, "vector.index_host", config.vector.index_host.as_deref());
            require(&mut errors, "vector.api_key", exposed(&config.vector.api_key));
            require(&mut errors, "completion.api_key", exposed(&config.completion.api_key));
            check_url(&mut errors, "embedding.api_url", Some(&config.embedding.api_url));
            check_url(&mut errors, "completion.api_url", Some(&config.completion.api_url));
            check_url(&mut errors, "vector.index_host", config.vector.index_host.as_deref());
        }
        RagMode::Remote => {
            require(&mut errors, "rag.endpoint", config.rag.endpoint.as_deref());
            check_url(&mut errors, "rag.endpoint", config.rag.endpoint.as_deref());
        }
    }

    check_url(&mut errors, "gateway.api_url", config.gateway.api_url.as_deref());

    if config.rag.top_k == 0 {
        errors.push(ConfigError::Validation {
            message: "rag.top_k must be at least 1".to_string(),
        });
    }

    if config.gateway.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.server.max_body_bytes == 0 {
        errors.push(ConfigError::Validation {
            message: "server.max_body_bytes must be at least 1".to_string(),
        });
    }

    if !config.server.webhook_path.starts_with('/') {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.webhook_path `{}` must start with `/`",
                config.server.webhook_path
            ),
        });
    }

    if !LOG_LEVELS.contains(&config.server.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` is not one of {}",
                config.server.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn exposed(secret: &Option<SecretString>) -> Option<&str> {
    secret.as_ref().map(|s| s.expose_secret())
}

fn require(errors: &mut Vec<ConfigError>, key: &str, value: Option<&str>) {
    if value.is_none_or(|v| v.trim().is_empty()) {
        errors.push(ConfigError::MissingKey {
            key: key.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: Option<&str>) {
    let Some(url) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{url}` must start with http:// or https://"),
        });
    }
}
