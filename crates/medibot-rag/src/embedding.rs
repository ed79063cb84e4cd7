// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible embedding client.

use async_trait::async_trait;
use medibot_config::model::EmbeddingConfig;
use medibot_core::{AdapterType, EmbeddingAdapter, HealthStatus, MedibotError, PluginAdapter};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::{client_with_header, join, post_json};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Calls `POST {api_url}/embeddings` for a single input string.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, MedibotError> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().trim())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| MedibotError::Config("embedding.api_key is not set".into()))?;
        Ok(Self {
            client: client_with_header("authorization", &format!("Bearer {api_key}"))?,
            base_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai-embeddings"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        Ok(models_health(&self.client, &self.base_url).await)
    }
}

#[async_trait]
impl EmbeddingAdapter for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MedibotError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };
        let response: EmbeddingResponse = post_json(
            &self.client,
            &join(&self.base_url, "embeddings"),
            &request,
            "embedding API",
        )
        .await?;

        let vector = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MedibotError::Provider {
                message: "embedding API returned no vectors".into(),
                source: None,
            })?;
        debug!(dimensions = vector.len(), "query embedded");
        Ok(vector)
    }
}

/// `GET {base}/models`, shared by the OpenAI-compatible clients.
pub(crate) async fn models_health(client: &reqwest::Client, base_url: &str) -> HealthStatus {
    match client.get(join(base_url, "models")).send().await {
        Ok(resp) if resp.status().is_success() => HealthStatus::Healthy,
        Ok(resp) => HealthStatus::Degraded(format!(
            "models endpoint returned HTTP {}",
            resp.status().as_u16()
        )),
        Err(e) => HealthStatus::Unhealthy(format!("unreachable: {e}")),
    }
}
