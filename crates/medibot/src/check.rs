// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `medibot check` command implementation.
//!
//! Prints a redacted summary of the loaded configuration, then checks each
//! collaborator (chat gateway, answer retriever, user database) once.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

use medibot_config::model::{MedibotConfig, RagMode};
use medibot_core::{HealthStatus, MedibotError, PluginAdapter};
use medibot_rag::build_retriever;
use medibot_storage::SqliteUserDirectory;
use medibot_whatsapp::GatewayMessenger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Runs all checks; `Ok(false)` when any check failed.
pub async fn run_check(config: &MedibotConfig, plain: bool) -> Result<bool, MedibotError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    println!("medibot {}", env!("CARGO_PKG_VERSION"));
    for line in summary(config) {
        println!("  {line}");
    }
    println!();

    let results = vec![
        check_adapter(
            "gateway",
            GatewayMessenger::from_config(&config.gateway).map(Arc::new),
        )
        .await,
        check_adapter("retriever", build_retriever(config)).await,
        check_database(config).await,
    ];

    let failed = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    let warned = results.iter().filter(|r| r.status == CheckStatus::Warn).count();
    for result in &results {
        println!("{}", format_result(result, use_color));
    }
    println!();
    println!(
        "{} checks, {} warnings, {} failures",
        results.len(),
        warned,
        failed
    );
    Ok(failed == 0)
}

fn presence<T>(value: &Option<T>) -> &'static str {
    if value.is_some() { "set" } else { "missing" }
}

/// Non-secret configuration lines.
fn summary(config: &MedibotConfig) -> Vec<String> {
    let mut lines = vec![
        format!(
            "listen: {}:{}{}",
            config.server.host, config.server.port, config.server.webhook_path
        ),
        format!(
            "gateway: {} ({:?} flavor, token {})",
            config.gateway.api_url.as_deref().unwrap_or("-"),
            config.gateway.flavor,
            presence(&config.gateway.token)
        ),
    ];
    match config.rag.mode {
        RagMode::Pipeline => {
            lines.push(format!(
                "rag: pipeline (top_k {}, embedding {} key {}, completion {} key {})",
                config.rag.top_k,
                config.embedding.model,
                presence(&config.embedding.api_key),
                config.completion.model,
                presence(&config.completion.api_key)
            ));
            lines.push(format!(
                "vector index: {} (key {})",
                config.vector.index_host.as_deref().unwrap_or("-"),
                presence(&config.vector.api_key)
            ));
        }
        RagMode::Remote => lines.push(format!(
            "rag: remote {}",
            config.rag.endpoint.as_deref().unwrap_or("-")
        )),
    }
    lines.push(format!(
        "database: {}",
        config.storage.database_url.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "non-medical messages: {}",
        if config.handler.reject_non_medical { "rejected" } else { "ignored" }
    ));
    lines
}

async fn check_adapter<A>(name: &str, adapter: Result<Arc<A>, MedibotError>) -> CheckResult
where
    A: PluginAdapter + ?Sized,
{
    let start = Instant::now();
    let (status, message) = match adapter {
        Err(e) => (CheckStatus::Fail, e.to_string()),
        Ok(adapter) => {
            let label = format!("{} v{}", adapter.name(), adapter.version());
            match adapter.health_check().await {
                Ok(HealthStatus::Healthy) => (CheckStatus::Pass, format!("{label} reachable")),
                Ok(HealthStatus::Degraded(msg)) => (CheckStatus::Warn, format!("{label}: {msg}")),
                Ok(HealthStatus::Unhealthy(msg)) => (CheckStatus::Fail, format!("{label}: {msg}")),
                Err(e) => (CheckStatus::Fail, format!("{label}: {e}")),
            }
        }
    };
    CheckResult {
        name: name.to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_database(config: &MedibotConfig) -> CheckResult {
    let adapter = match config.storage.database_url.as_deref() {
        Some(url) => SqliteUserDirectory::open(url).await.map(Arc::new),
        None => Err(MedibotError::Config("storage.database_url is not set".into())),
    };
    check_adapter("database", adapter).await
}

fn format_result(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let ms = result.duration.as_millis();
    let (tag, symbol) = match result.status {
        CheckStatus::Pass => ("[OK]  ", "✓".green()),
        CheckStatus::Warn => ("[WARN]", "!".yellow()),
        CheckStatus::Fail => ("[FAIL]", "✗".red()),
    };
    if use_color {
        format!("  {symbol} {:<10} {} ({ms}ms)", result.name, result.message)
    } else {
        format!("  {tag} {:<10} {} ({ms}ms)", result.name, result.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_never_prints_secrets() {
        let mut config = MedibotConfig::default();
        config.gateway.api_url = Some("https://gate.example".into());
        config.gateway.token = Some("super-secret-token".into());
        config.embedding.api_key = Some("sk-secret".into());

        let text = summary(&config).join("\n");
        assert!(text.contains("https://gate.example"));
        assert!(text.contains("token set"));
        assert!(!text.contains("super-secret-token"));
        assert!(!text.contains("sk-secret"));
    }

    #[test]
    fn plain_format_uses_tags() {
        let line = format_result(
            &CheckResult {
                name: "gateway".into(),
                status: CheckStatus::Fail,
                message: "unreachable".into(),
                duration: Duration::from_millis(3),
            },
            false,
        );
        assert_eq!(line, "  [FAIL] gateway    unreachable (3ms)");
    }

    #[tokio::test]
    async fn healthy_adapter_reports_name_and_version() {
        let messenger = Arc::new(medibot_test_utils::MockMessenger::new());
        let result = check_adapter("gateway", Ok(messenger)).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.message, "mock-messenger v0.1.0 reachable");
    }

    #[tokio::test]
    async fn missing_database_url_fails_check() {
        let result = check_database(&MedibotConfig::default()).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("database_url"));
    }
}
