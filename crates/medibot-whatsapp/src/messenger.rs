// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the outbound WhatsApp gateway.
//!
//! [`GatewayMessenger`] sends one bearer-authenticated POST per reply and
//! classifies failures into [`DeliveryError`] variants. No retries.

use std::time::Duration;

use async_trait::async_trait;
use medibot_config::model::{GatewayConfig, GatewayFlavor};
use medibot_core::{
    AdapterType, DeliveryError, DeliveryReceipt, HealthStatus, MedibotError, Messenger,
    PluginAdapter,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Outbound request body, shaped by [`GatewayFlavor`].
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SendBody<'a> {
    Text {
        to: &'a str,
        text: &'a str,
    },
    Whapi {
        to: &'a str,
        body: &'a str,
        typing_time: u32,
    },
}

/// Chat gateway client implementing [`Messenger`].
#[derive(Debug, Clone)]
pub struct GatewayMessenger {
    client: reqwest::Client,
    base_url: String,
    send_path: String,
    health_path: String,
    flavor: GatewayFlavor,
    typing_time: u32,
    timeout: Duration,
}

impl GatewayMessenger {
    /// Builds a messenger from the `[gateway]` config section.
    ///
    /// Fails with [`MedibotError::Config`] when the API URL or token is
    /// missing, or the token is not a valid header value.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, MedibotError> {
        let base_url = config
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| MedibotError::Config("gateway.api_url is not set".into()))?;
        let token = config
            .token
            .as_ref()
            .map(|t| t.expose_secret().trim())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| MedibotError::Config("gateway.token is not set".into()))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            MedibotError::Config(format!("invalid gateway token header value: {e}"))
        })?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MedibotError::Provider {
                message: format!("failed to build gateway HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            send_path: config.send_path.clone(),
            health_path: config.health_path.clone(),
            flavor: config.flavor,
            typing_time: config.typing_time,
            timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn body<'a>(&self, to: &'a str, text: &'a str) -> SendBody<'a> {
        match self.flavor {
            GatewayFlavor::Text => SendBody::Text { to, text },
            GatewayFlavor::Whapi => SendBody::Whapi {
                to,
                body: text,
                typing_time: self.typing_time,
            },
        }
    }

    fn classify_transport(&self, err: reqwest::Error) -> DeliveryError {
        if err.is_timeout() {
            DeliveryError::Timeout {
                after: self.timeout,
            }
        } else {
            DeliveryError::Transport {
                message: err.to_string(),
            }
        }
    }
}

/// Pulls a provider message id out of a send response, if one is present.
fn extract_message_id(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/message/id"),
        value.pointer("/id"),
        value.pointer("/data/msgId"),
        value.pointer("/data/id"),
    ];
    candidates.into_iter().flatten().find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[async_trait]
impl PluginAdapter for GatewayMessenger {
    fn name(&self) -> &str {
        "whatsapp-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Messenger
    }

    async fn health_check(&self) -> Result<HealthStatus, MedibotError> {
        match self.client.get(self.url(&self.health_path)).send().await {
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) => Ok(HealthStatus::Degraded(format!(
                "gateway health endpoint returned HTTP {}",
                resp.status().as_u16()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(
                self.classify_transport(e).to_string(),
            )),
        }
    }
}

#[async_trait]
impl Messenger for GatewayMessenger {
    async fn send(&self, recipient: &str, text: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let url = self.url(&self.send_path);
        debug!(recipient, chars = text.chars().count(), "sending gateway message");

        let response = self
            .client
            .post(&url)
            .json(&self.body(recipient, text))
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), recipient, "gateway rejected message");
            return Err(DeliveryError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(DeliveryReceipt {
            status: status.as_u16(),
            message_id: extract_message_id(&body),
        })
    }
}
