// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP server built on axum.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use medibot_config::model::ServerConfig;
use medibot_core::MedibotError;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::webhook::WebhookHandler;

/// Webhook body cap used unless [`GatewayState::with_body_limit`] says otherwise.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub webhook: Arc<WebhookHandler>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Largest webhook body buffered, in bytes.
    pub body_limit: usize,
}

impl GatewayState {
    pub fn new(webhook: WebhookHandler) -> Self {
        Self {
            webhook: Arc::new(webhook),
            start_time: Instant::now(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

/// Secondary webhook route, `{webhook_path}/whatsapp`.
fn alias_path(webhook_path: &str) -> String {
    format!("{}/whatsapp", webhook_path.trim_end_matches('/'))
}

/// Builds the router:
/// - POST `{webhook_path}` and `{webhook_path}/whatsapp`
/// - GET /health
///
/// Bodies over `state.body_limit` reach the handler as a rejection, which it
/// acknowledges like any other ignored event.
pub fn build_router(state: GatewayState, webhook_path: &str) -> Router {
    let body_limit = DefaultBodyLimit::max(state.body_limit);
    Router::new()
        .route(webhook_path, post(handlers::post_webhook))
        .route(&alias_path(webhook_path), post(handlers::post_webhook))
        .route("/health", get(handlers::get_health))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `host:port` and serves until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), MedibotError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state, &config.webhook_path);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            MedibotError::Internal(format!("failed to bind webhook server to {addr}: {e}"))
        })?;

    info!(%addr, webhook_path = %config.webhook_path, "webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| MedibotError::Internal(format!("webhook server error: {e}")))?;

    info!("webhook server stopped");
    Ok(())
}
