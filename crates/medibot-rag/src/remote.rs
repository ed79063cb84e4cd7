// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retriever that delegates to a separately deployed RAG service.

use async_trait::async_trait;
use medibot_core::{
    AdapterType, AnswerResult, AnswerRetriever, HealthStatus, MedibotError, PluginAdapter,
};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct QuestionBody<'a> {
    question: &'a str,
}

/// POSTs `{"question": ...}` to `rag.endpoint` and treats the response body
/// as the answer text. An empty body is a valid "no answer".
pub struct RemoteRetriever {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteRetriever {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, MedibotError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(MedibotError::Config("rag.endpoint is not set".into()));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| MedibotError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, endpoint })
    }
}

fn failed(message: String, source: Option<reqwest::Error>) -> MedibotError {
    MedibotError::Retrieval {
        message,
        source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

#[async_trait]
impl PluginAdapter for RemoteRetriever {
    fn name(&self) -> &str {
        "rag-remote"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Retriever
    }

    /// Any HTTP answer counts as reachable; the endpoint may not accept GET.
    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        Ok(match self.client.get(&self.endpoint).send().await {
            Ok(resp) if resp.status().is_server_error() => HealthStatus::Degraded(format!(
                "RAG endpoint returned HTTP {}",
                resp.status().as_u16()
            )),
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(format!("RAG endpoint unreachable: {e}")),
        })
    }
}

#[async_trait]
impl AnswerRetriever for RemoteRetriever {
    async fn retrieve(&self, question: &str) -> Result<AnswerResult, MedibotError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&QuestionBody { question })
            .send()
            .await
            .map_err(|e| failed(format!("RAG endpoint request failed: {e}"), Some(e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| failed(format!("RAG endpoint body could not be read: {e}"), Some(e)))?;

        if !status.is_success() {
            return Err(failed(
                format!("RAG endpoint returned HTTP {}: {body}", status.as_u16()),
                None,
            ));
        }

        debug!(chars = body.len(), "remote answer received");
        Ok(AnswerResult::new(body.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(json!({ "question": "What are the symptoms of malaria?" })))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    async fn ask(server: &MockServer) -> Result<AnswerResult, MedibotError> {
        RemoteRetriever::new(format!("{}/ask", server.uri()))
            .unwrap()
            .retrieve("What are the symptoms of malaria?")
            .await
    }

    #[tokio::test]
    async fn raw_body_is_answer() {
        let server = server_with(200, "Fever, chills and headache.\n").await;
        let answer = ask(&server).await.unwrap();
        assert_eq!(answer.text, "Fever, chills and headache.");
    }

    #[tokio::test]
    async fn empty_body_is_empty_answer() {
        let server = server_with(200, "").await;
        assert!(ask(&server).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_2xx_is_retrieval_error() {
        let server = server_with(502, "bad gateway").await;
        let err = ask(&server).await.unwrap_err();
        assert!(matches!(err, MedibotError::Retrieval { .. }));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn blank_endpoint_rejected() {
        assert!(matches!(RemoteRetriever::new("  "), Err(MedibotError::Config(_))));
    }
}
