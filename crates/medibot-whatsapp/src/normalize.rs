// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook payload normalization.
//!
//! Two gateway formats are recognized:
//!
//! - **Wasender**: `{"event": "messages.received", "data": {"messages": {...}}}`
//!   with Baileys-style `key.remoteJid` / `message.conversation` fields
//! - **Whapi**: `{"event": {"type": "messages", "event": "post"}, "messages": [...]}`
//!   with flat `chat_id` / `from_me` / `text.body` fields
//!
//! Leaf fields are read leniently: a field with an unexpected JSON type is
//! treated as absent rather than failing the whole payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use medibot_core::NormalizedMessage;

/// JID suffix used by WhatsApp for group chats.
pub const GROUP_JID_SUFFIX: &str = "@g.us";

/// Event tag of a Wasender inbound message.
const WASENDER_EVENT: &str = "messages.received";

/// `event.type` of a Whapi message batch.
const WHAPI_EVENT_TYPE: &str = "messages";

/// `event.event` of a newly posted Whapi message (edits and deletes use other verbs).
const WHAPI_EVENT_POST: &str = "post";

/// Deserializes any JSON into `Option<T>`, mapping type mismatches to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Message container of a Wasender `messages.received` event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasenderMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<WasenderKey>,
    #[serde(default, deserialize_with = "lenient")]
    pub remote_jid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub push_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<WasenderContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasenderKey {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub from_me: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub remote_jid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasenderContent {
    #[serde(default, deserialize_with = "lenient")]
    pub conversation: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub extended_text_message: Option<TextField>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_message: Option<CaptionField>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextField {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionField {
    #[serde(default, deserialize_with = "lenient")]
    pub caption: Option<String>,
}

/// One entry of a Whapi `messages` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhapiMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub from_me: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub chat_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub from_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<WhapiText>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<CaptionField>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhapiText {
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
}

/// A recognized inbound message event, tagged by gateway format.
#[derive(Debug, Clone)]
pub enum WebhookPayload {
    Wasender(WasenderMessage),
    Whapi(WhapiMessage),
}

impl WebhookPayload {
    /// Recognizes a message event in a raw webhook body.
    ///
    /// Returns `None` for any other event (status updates, presence, edits)
    /// or when the message container is missing.
    pub fn detect(body: &Value) -> Option<Self> {
        match body.get("event")? {
            Value::String(tag) if tag == WASENDER_EVENT => {
                let container = body.get("data")?.get("messages")?;
                if !container.is_object() {
                    debug!("wasender event without a message object");
                    return None;
                }
                serde_json::from_value(container.clone())
                    .ok()
                    .map(WebhookPayload::Wasender)
            }
            Value::Object(event)
                if event.get("type").and_then(Value::as_str) == Some(WHAPI_EVENT_TYPE) =>
            {
                let verb = event.get("event").and_then(Value::as_str);
                if verb.is_some_and(|v| v != WHAPI_EVENT_POST) {
                    debug!(verb, "ignoring non-post whapi message event");
                    return None;
                }
                let batch = body.get("messages")?.as_array()?;
                let first = batch.first()?;
                if batch.len() > 1 {
                    debug!(
                        skipped = batch.len() - 1,
                        "whapi batch has extra messages, using the first"
                    );
                }
                serde_json::from_value(first.clone())
                    .ok()
                    .map(WebhookPayload::Whapi)
            }
            _ => None,
        }
    }

    /// Reduces the provider message to the canonical record.
    pub fn normalize(&self) -> NormalizedMessage {
        let (sender_id, message_id, is_from_self, text, display_name) = match self {
            WebhookPayload::Wasender(msg) => {
                let key = msg.key.as_ref();
                let sender = first_present([
                    key.and_then(|k| k.remote_jid.as_deref()),
                    msg.remote_jid.as_deref(),
                ]);
                let content = msg.message.as_ref();
                let text = first_present([
                    content.and_then(|c| c.conversation.as_deref()),
                    content
                        .and_then(|c| c.extended_text_message.as_ref())
                        .and_then(|t| t.text.as_deref()),
                    content
                        .and_then(|c| c.image_message.as_ref())
                        .and_then(|i| i.caption.as_deref()),
                ]);
                (
                    sender,
                    key.and_then(|k| k.id.clone()),
                    key.and_then(|k| k.from_me).unwrap_or(false),
                    text,
                    first_present([msg.push_name.as_deref()]),
                )
            }
            WebhookPayload::Whapi(msg) => {
                let sender = first_present([msg.chat_id.as_deref(), msg.from.as_deref()]);
                let text = first_present([
                    msg.text.as_ref().and_then(|t| t.body.as_deref()),
                    msg.image.as_ref().and_then(|i| i.caption.as_deref()),
                ]);
                (
                    sender,
                    msg.id.clone(),
                    msg.from_me.unwrap_or(false),
                    text,
                    first_present([msg.from_name.as_deref()]),
                )
            }
        };

        NormalizedMessage {
            is_group_chat: sender_id.as_deref().is_some_and(is_group_jid),
            sender_id,
            message_id,
            is_from_self,
            text,
            display_name,
        }
    }

    /// Short name of the gateway format, for logs.
    pub fn format(&self) -> &'static str {
        match self {
            WebhookPayload::Wasender(_) => "wasender",
            WebhookPayload::Whapi(_) => "whapi",
        }
    }
}

/// First candidate that is non-empty after trimming, trimmed.
fn first_present<const N: usize>(candidates: [Option<&str>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Normalizes a raw webhook body; `None` means "not a message event".
pub fn normalize(body: &Value) -> Option<NormalizedMessage> {
    WebhookPayload::detect(body).map(|payload| payload.normalize())
}

/// True iff the chat address is a group chat.
pub fn is_group_jid(jid: &str) -> bool {
    jid.ends_with(GROUP_JID_SUFFIX)
}

/// Extracts the phone number part of a direct-chat JID.
///
/// `2348012345678:4@s.whatsapp.net` yields `2348012345678`. Returns `None`
/// for group JIDs and addresses with no digits.
pub fn phone_from_jid(jid: &str) -> Option<String> {
    if is_group_jid(jid) {
        return None;
    }
    let user = jid.split('@').next().unwrap_or(jid);
    let user = user.split(':').next().unwrap_or(user);
    let phone: String = user.trim_start_matches('+').to_string();
    if !phone.is_empty() && phone.chars().all(|c| c.is_ascii_digit()) {
        Some(phone)
    } else {
        None
    }
}
