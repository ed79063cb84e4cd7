// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Medibot.
//!
//! TOML files in the XDG hierarchy are merged with `MEDIBOT_*` environment
//! variables (a local `.env` file is read first). Every struct rejects unknown
//! keys, and a validation pass checks that the credentials each collaborator
//! needs are present so the process fails at startup instead of on the first
//! webhook.
//!
//! # Usage
//!
//! ```no_run
//! use medibot_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MedibotConfig;

/// Loads configuration from the default locations and validates it.
///
/// Deserialization errors become miette diagnostics with typo suggestions;
/// otherwise every semantic validation error is returned at once.
pub fn load_and_validate() -> Result<MedibotConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Loads configuration from a TOML string (no env overrides) and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<MedibotConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![(
            diagnostic::INLINE_SOURCE.to_string(),
            toml_content.to_string(),
        )]
    })
}

/// Loads one explicit file plus env overrides and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<MedibotConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_sources([path.to_path_buf()])
    })
}

/// Sources are only read when there is an error to point into.
fn finish(
    loaded: Result<MedibotConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<MedibotConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Contents of every default config file that exists, keyed by the path
/// figment reports for it.
fn collect_toml_sources() -> Vec<(String, String)> {
    read_sources(loader::default_config_paths())
}

fn read_sources(paths: impl IntoIterator<Item = PathBuf>) -> Vec<(String, String)> {
    paths
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let absolute = std::path::absolute(&path).unwrap_or(path);
            Some((absolute.display().to_string(), content))
        })
        .collect()
}
