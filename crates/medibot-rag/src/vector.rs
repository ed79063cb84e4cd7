// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pinecone-style vector index client.
//!
//! Talks to the index data plane directly: `POST {index_host}/query` with an
//! `Api-Key` header. Chunk text is expected under `metadata.text`.

use async_trait::async_trait;
use medibot_config::model::VectorConfig;
use medibot_core::types::VectorMatch;
use medibot_core::{AdapterType, HealthStatus, MedibotError, PluginAdapter, VectorIndex};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::http::{client_with_header, join, post_json};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    #[serde(default)]
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Value>,
}

impl From<QueryMatch> for VectorMatch {
    fn from(m: QueryMatch) -> Self {
        let text = m
            .metadata
            .as_ref()
            .and_then(|md| md.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string);
        VectorMatch {
            id: m.id,
            score: m.score,
            text,
        }
    }
}

pub struct PineconeIndex {
    client: reqwest::Client,
    host: String,
    namespace: Option<String>,
}

impl PineconeIndex {
    pub fn from_config(config: &VectorConfig) -> Result<Self, MedibotError> {
        let host = config
            .index_host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| MedibotError::Config("vector.index_host is not set".into()))?;
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().trim())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| MedibotError::Config("vector.api_key is not set".into()))?;
        Ok(Self {
            client: client_with_header("api-key", api_key)?,
            host: host.to_string(),
            namespace: config.namespace.clone().filter(|n| !n.is_empty()),
        })
    }
}

#[async_trait]
impl PluginAdapter for PineconeIndex {
    fn name(&self) -> &str {
        "pinecone"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VectorIndex
    }

    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        let stats: Result<Value, _> = post_json(
            &self.client,
            &join(&self.host, "describe_index_stats"),
            &serde_json::json!({}),
            "vector index",
        )
        .await;
        Ok(match stats {
            Ok(stats) => match stats.get("totalVectorCount").and_then(Value::as_u64) {
                Some(0) => HealthStatus::Degraded("index holds no vectors".into()),
                _ => HealthStatus::Healthy,
            },
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, MedibotError> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };
        let response: QueryResponse =
            post_json(&self.client, &join(&self.host, "query"), &request, "vector index").await?;
        debug!(matches = response.matches.len(), top_k, "vector query complete");
        Ok(response.matches.into_iter().map(VectorMatch::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn index(url: &str, namespace: Option<&str>) -> PineconeIndex {
        PineconeIndex::from_config(&VectorConfig {
            index_host: Some(url.to_string()),
            api_key: Some("pc-key".into()),
            namespace: namespace.map(str::to_string),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn query_sends_top_k_and_reads_metadata_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(header("api-key", "pc-key"))
            .and(body_json(json!({
                "vector": [0.5, 0.25],
                "topK": 3,
                "includeMetadata": true,
                "includeValues": false,
                "namespace": "guides"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [
                    {
                        "id": "c1",
                        "score": 0.91,
                        "metadata": { "text": "Malaria is spread by mosquitoes." }
                    },
                    { "id": "c2", "score": 0.80, "metadata": { "source": "no text here" } }
                ],
                "namespace": "guides"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let matches = index(&server.uri(), Some("guides"))
            .query(&[0.5, 0.25], 3)
            .await
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "c1");
        assert_eq!(matches[0].text.as_deref(), Some("Malaria is spread by mosquitoes."));
        assert!(matches[1].text.is_none());
    }

    #[tokio::test]
    async fn no_matches_is_empty_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "matches": [] })))
            .mount(&server)
            .await;

        let matches = index(&server.uri(), None).query(&[1.0], 3).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn empty_index_reports_degraded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/describe_index_stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dimension": 1536,
                "totalVectorCount": 0
            })))
            .mount(&server)
            .await;

        let status = index(&server.uri(), None).health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Degraded(_)));
    }
}
