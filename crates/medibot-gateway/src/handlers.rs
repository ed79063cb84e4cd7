// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles POST on the webhook routes and GET /health.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    extract::rejection::{BytesRejection, FailedToBufferBody},
};
use serde::Serialize;
use tracing::warn;

use crate::server::GatewayState;
use crate::webhook::{IgnoreReason, WebhookOutcome, WebhookResponse};

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /webhook
///
/// Takes the body as raw bytes so malformed JSON is reported in the
/// response body instead of being rejected by an extractor. Bodies that
/// cannot be buffered, including those over the size cap, are ignored.
/// Always 200.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<WebhookResponse> {
    let outcome = match body {
        Ok(body) => state.webhook.handle(&body).await,
        Err(rejection) => unbuffered(&rejection, state.body_limit),
    };
    Json(outcome.to_response())
}

fn unbuffered(rejection: &BytesRejection, limit: usize) -> WebhookOutcome {
    match rejection {
        BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
            warn!(limit, "webhook body over size cap, ignoring");
            WebhookOutcome::Ignored(IgnoreReason::BodyTooLarge)
        }
        other => {
            warn!(error = %other, "failed to read webhook body, ignoring");
            WebhookOutcome::Ignored(IgnoreReason::UnreadableBody)
        }
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
