// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook gateway for Medibot.
//!
//! Receives chat-provider webhooks over HTTP, runs them through the
//! [`WebhookHandler`] and always acknowledges with 200 and a
//! `{status, reason}` body. Webhook providers retry on non-2xx, and a retry
//! would repeat the user-facing reply.

pub mod handlers;
pub mod replies;
pub mod server;
pub mod webhook;

pub use server::{GatewayState, build_router, start_server};
pub use webhook::{IgnoreReason, NoticeStatus, WebhookHandler, WebhookOutcome, WebhookResponse};
