// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp channel plumbing for Medibot.
//!
//! - [`normalize`]: turns a provider webhook body into a [`NormalizedMessage`]
//!   regardless of which gateway format delivered it
//! - [`messenger`]: [`GatewayMessenger`], the outbound send-text client
//!
//! [`NormalizedMessage`]: medibot_core::NormalizedMessage

pub mod messenger;
pub mod normalize;

pub use messenger::GatewayMessenger;
pub use normalize::{is_group_jid, normalize, phone_from_jid, WebhookPayload, GROUP_JID_SUFFIX};
