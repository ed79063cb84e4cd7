// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Credentials are [`SecretString`]s that default to
//! `None` and are enforced by [`crate::validation`]. They are never
//! serialized and print as `[REDACTED]`.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Top-level Medibot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MedibotConfig {
    /// HTTP listener and logging.
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat gateway used for outbound messages.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Answer retrieval strategy.
    #[serde(default)]
    pub rag: RagConfig,

    /// Embedding API used by the pipeline retriever.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector index used by the pipeline retriever.
    #[serde(default)]
    pub vector: VectorConfig,

    /// Chat completion API used by the pipeline retriever.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// User directory database.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook reply policy.
    #[serde(default)]
    pub handler: HandlerConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Route the chat provider posts webhooks to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Largest webhook body read, in bytes. Larger bodies are acknowledged
    /// and ignored.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
            log_level: default_log_level(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

/// Request body format accepted by the chat gateway's send endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayFlavor {
    /// `{"to": ..., "text": ...}`
    #[default]
    Text,
    /// `{"to": ..., "body": ..., "typing_time": ...}`
    Whapi,
}

/// Outbound chat gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Gateway API base URL, e.g. `https://gate.whapi.cloud`.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer token for the gateway API.
    #[serde(default, skip_serializing)]
    pub token: Option<SecretString>,

    /// Path of the send-text endpoint, appended to `api_url`.
    #[serde(default = "default_send_path")]
    pub send_path: String,

    /// Path checked by `medibot check`, appended to `api_url`.
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Body format of the send endpoint.
    #[serde(default)]
    pub flavor: GatewayFlavor,

    /// Simulated typing delay in seconds (whapi flavor only).
    #[serde(default)]
    pub typing_time: u32,

    /// Per-request timeout for outbound sends.
    #[serde(default = "default_gateway_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            token: None,
            send_path: default_send_path(),
            health_path: default_health_path(),
            flavor: GatewayFlavor::default(),
            typing_time: 0,
            timeout_secs: default_gateway_timeout_secs(),
        }
    }
}

fn default_send_path() -> String {
    "/messages/text".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_gateway_timeout_secs() -> u64 {
    10
}

/// Where answers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RagMode {
    /// Embed, search and complete in-process against the hosted APIs.
    #[default]
    Pipeline,
    /// Delegate to a separate RAG service over HTTP.
    Remote,
}

/// Answer retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RagConfig {
    #[serde(default)]
    pub mode: RagMode,

    /// RAG service URL accepting `POST {"question": ...}` (remote mode).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Number of chunks pulled from the vector index per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Overrides the built-in system prompt for the completion model.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            mode: RagMode::default(),
            endpoint: None,
            top_k: default_top_k(),
            system_prompt: None,
        }
    }
}

fn default_top_k() -> usize {
    3
}

/// Embedding API configuration (OpenAI-compatible).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    #[serde(default = "default_openai_url")]
    pub api_url: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_embedding_model")]
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: default_openai_url(),
            api_key: None,
            model: default_embedding_model(),
        }
    }
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

/// Vector index configuration (Pinecone-style data plane).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VectorConfig {
    /// Index data-plane host, e.g. `https://medical-abc123.svc.pinecone.io`.
    #[serde(default)]
    pub index_host: Option<String>,

    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Optional namespace inside the index.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Chat completion API configuration (OpenAI-compatible).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    #[serde(default = "default_openai_url")]
    pub api_url: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_completion_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: default_openai_url(),
            api_key: None,
            model: default_completion_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_completion_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

/// User directory database configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database location: a file path or a `sqlite://` URL.
    #[serde(default)]
    pub database_url: Option<String>,
}

/// Webhook reply policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Send the fixed rejection text for non-medical messages instead of
    /// ignoring them silently.
    #[serde(default = "default_reject_non_medical")]
    pub reject_non_medical: bool,

    /// Name the bot introduces itself with in the welcome message.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            reject_non_medical: default_reject_non_medical(),
            bot_name: default_bot_name(),
        }
    }
}

fn default_reject_non_medical() -> bool {
    true
}

fn default_bot_name() -> String {
    "Medibot".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn debug_output_redacts_credentials() {
        let mut config = MedibotConfig::default();
        config.gateway.token = Some("gw-secret".into());
        config.embedding.api_key = Some("emb-secret".into());
        config.vector.api_key = Some("vec-secret".into());
        config.completion.api_key = Some("llm-secret".into());

        let debug = format!("{config:?}");
        for secret in ["gw-secret", "emb-secret", "vec-secret", "llm-secret"] {
            assert!(!debug.contains(secret), "{secret} leaked into Debug output");
        }
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn credentials_deserialize_but_never_serialize() {
        let toml_str = r#"
[gateway]
token = "gw-secret"

[vector]
api_key = "vec-secret"
"#;
        let config: MedibotConfig = toml::from_str(toml_str).unwrap();
        let token = config.gateway.token.as_ref().map(|t| t.expose_secret());
        assert_eq!(token, Some("gw-secret"));

        let out = toml::to_string(&config).unwrap();
        assert!(!out.contains("gw-secret"));
        assert!(!out.contains("vec-secret"));
    }

    #[test]
    fn flavor_and_mode_parse_lowercase() {
        let toml_str = r#"
[gateway]
flavor = "whapi"

[rag]
mode = "remote"
"#;
        let config: MedibotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.flavor, GatewayFlavor::Whapi);
        assert_eq!(config.rag.mode, RagMode::Remote);
    }

    #[test]
    fn defaults_are_sensible() {
        let config = MedibotConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.webhook_path, "/webhook");
        assert_eq!(config.gateway.timeout_secs, 10);
        assert_eq!(config.gateway.flavor, GatewayFlavor::Text);
        assert_eq!(config.rag.mode, RagMode::Pipeline);
        assert_eq!(config.rag.top_k, 3);
        assert!(config.handler.reject_non_medical);
    }
}
