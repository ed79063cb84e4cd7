// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completion client.

use async_trait::async_trait;
use medibot_config::model::CompletionConfig;
use medibot_core::types::{ChatMessage, CompletionRequest, CompletionResponse};
use medibot_core::{AdapterType, CompletionAdapter, HealthStatus, MedibotError, PluginAdapter};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::models_health;
use crate::http::{client_with_header, join, post_json};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Calls `POST {api_url}/chat/completions` without streaming.
pub struct OpenAiCompletion {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompletion {
    pub fn from_config(config: &CompletionConfig) -> Result<Self, MedibotError> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().trim())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| MedibotError::Config("completion.api_key is not set".into()))?;
        Ok(Self {
            client: client_with_header("authorization", &format!("Bearer {api_key}"))?,
            base_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl PluginAdapter for OpenAiCompletion {
    fn name(&self) -> &str {
        "openai-chat"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        Ok(models_health(&self.client, &self.base_url).await)
    }
}

#[async_trait]
impl CompletionAdapter for OpenAiCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, MedibotError> {
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature.or(Some(self.temperature)),
        };
        let response: ChatResponse = post_json(
            &self.client,
            &join(&self.base_url, "chat/completions"),
            &body,
            "completion API",
        )
        .await?;

        debug!(choices = response.choices.len(), model = %self.model, "completion received");
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        Ok(CompletionResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(url: &str) -> OpenAiCompletion {
        OpenAiCompletion::from_config(&CompletionConfig {
            api_url: url.to_string(),
            api_key: Some("sk-chat".into()),
            ..CompletionConfig::default()
        })
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("what is malaria?")],
            temperature: None,
        }
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-chat"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "what is malaria?" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "A parasitic disease." }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = completion(&server.uri()).complete(request()).await.unwrap();
        assert_eq!(response.text.as_deref(), Some("A parasitic disease."));
    }

    #[tokio::test]
    async fn no_choices_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let response = completion(&server.uri()).complete(request()).await.unwrap();
        assert!(response.text.is_none());
    }

    #[tokio::test]
    async fn server_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = completion(&server.uri()).complete(request()).await.unwrap_err();
        assert!(matches!(err, MedibotError::Provider { .. }));
    }
}
