// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `medibot serve` command implementation.
//!
//! Wires the gateway messenger, the answer retriever selected by `rag.mode`
//! and the SQLite user directory into a [`WebhookHandler`], then serves the
//! webhook routes until SIGINT/SIGTERM.

use std::sync::Arc;

use medibot_config::model::MedibotConfig;
use medibot_core::{MedibotError, UserDirectory};
use medibot_gateway::{GatewayState, WebhookHandler, start_server};
use medibot_rag::build_retriever;
use medibot_storage::SqliteUserDirectory;
use medibot_whatsapp::GatewayMessenger;
use tracing::info;

use crate::shutdown;

pub async fn run_serve(config: MedibotConfig) -> Result<(), MedibotError> {
    init_tracing(&config.server.log_level);

    let messenger = Arc::new(GatewayMessenger::from_config(&config.gateway)?);
    let retriever = build_retriever(&config)?;

    let database_url = config
        .storage
        .database_url
        .as_deref()
        .ok_or_else(|| MedibotError::Config("storage.database_url is not set".into()))?;
    let directory: Arc<dyn UserDirectory> =
        Arc::new(SqliteUserDirectory::open(database_url).await?);

    let handler = WebhookHandler::new(messenger, retriever, config.handler.clone())
        .with_directory(directory);
    let state = GatewayState::new(handler).with_body_limit(config.server.max_body_bytes);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        rag_mode = ?config.rag.mode,
        gateway_flavor = ?config.gateway.flavor,
        "medibot starting"
    );

    let cancel = shutdown::install_signal_handler();
    start_server(&config.server, state, async move { cancel.cancelled().await }).await?;

    info!("medibot serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` overrides `server.log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "medibot={log_level},medibot_gateway={log_level},medibot_rag={log_level},\
medibot_whatsapp={log_level},medibot_storage={log_level},tower_http=info,warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
