// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config error reporting.
//!
//! Figment errors are turned into [`ConfigError`] diagnostics that point at
//! the offending TOML line when the source file is known, suggest the closest
//! valid key for typos, and name the `MEDIBOT_*` variable for missing values.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a candidate must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Name used for TOML passed as a string rather than read from a file.
pub const INLINE_SOURCE: &str = "<inline>";

/// A configuration problem, rendered with miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(medibot::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(medibot::config::invalid_type), help("use a value of type {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("this value")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A required value is absent or blank.
    #[error("missing required key `{key}`")]
    #[diagnostic(code(medibot::config::missing_key), help("{}", missing_key_help(key)))]
    MissingKey { key: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(medibot::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(medibot::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    let valid = format!("keys accepted here: {valid_keys}");
    suggestion.map_or(valid.clone(), |s| format!("did you mean `{s}`? {valid}"))
}

fn missing_key_help(key: &str) -> String {
    format!(
        "set `{key}` in medibot.toml or export {}",
        env_var_for_key(key)
    )
}

/// `gateway.api_url` -> `MEDIBOT_GATEWAY_API_URL`.
pub fn env_var_for_key(key: &str) -> String {
    format!("MEDIBOT_{}", key.replace('.', "_").to_ascii_uppercase())
}

/// Splits one figment error (which may hold several) into diagnostics.
///
/// `toml_sources` pairs a file path (or [`INLINE_SOURCE`]) with its content,
/// and is only used to attach source spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let location = locate(error, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                span: location.as_ref().map(|(span, _)| *span),
                src: location.map(|(_, src)| src),
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: qualified(error, field),
        },
        Kind::InvalidType(actual, expected) | Kind::InvalidValue(actual, expected) => {
            let (section, leaf) = split_leaf(&error.path);
            let location = leaf.and_then(|leaf| locate_in(error, section, leaf, toml_sources));
            ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
                span: location.as_ref().map(|(span, _)| *span),
                src: location.map(|(_, src)| src),
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

/// `section.field` when the error sits inside a section.
fn qualified(error: &figment::Error, field: &str) -> String {
    if error.path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", error.path.join("."))
    }
}

fn split_leaf(path: &[String]) -> (&[String], Option<&str>) {
    match path.split_last() {
        Some((leaf, section)) => (section, Some(leaf.as_str())),
        None => (path, None),
    }
}

fn locate(
    error: &figment::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    locate_in(error, &error.path, field, toml_sources)
}

/// Finds `field` under `section` in whichever source the error came from.
fn locate_in(
    error: &figment::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let origin = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => path.display().to_string(),
        _ => INLINE_SOURCE.to_string(),
    };
    let (name, content) = toml_sources.iter().find(|(name, _)| *name == origin)?;
    let offset = find_key_offset(content, section, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `field = ...` inside the `[section]` table (or at the top
/// level when `section` is empty).
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = if section.is_empty() {
        0
    } else {
        let header = format!("[{}]", section.join("."));
        content.find(&header)? + header.len()
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let body = line.trim_start();
        if body.starts_with('[') && offset != start {
            break;
        }
        let is_assignment = body
            .strip_prefix(field)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_assignment {
            return Some(offset + (line.len() - body.len()));
        }
        offset += line.len();
    }
    None
}

/// Closest valid key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints every error to stderr with miette's graphical renderer.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    eprintln!(
        "medibot: {} configuration problem{} found",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    );
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
