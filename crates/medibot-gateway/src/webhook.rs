// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook orchestration.
//!
//! [`WebhookHandler::handle`] takes one raw webhook body through
//! normalization, filtering, intent classification and (for medical
//! questions) answer retrieval, sends at most one primary reply, and reports
//! the result as a [`WebhookOutcome`]. It never fails: every path ends in an
//! outcome that the HTTP layer acknowledges with 200.
//!
//! Steps, first match wins:
//!
//! 1. body is not a recognized message event: ignored
//! 2. no sender, own message, group chat, or no text: ignored
//! 3. greeting: welcome reply
//! 4. not medical: rejection reply, or ignored when rejection is disabled
//! 5. medical: retrieve and send the answer; a retrieval failure sends a
//!    maintenance notice instead, an empty answer sends nothing
//!
//! A panic anywhere in steps 3-5 is caught and answered with a generic error
//! notice.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use strum::Display;
use tracing::{debug, error, info, warn};

use medibot_config::model::HandlerConfig;
use medibot_core::{AnswerRetriever, Messenger, NormalizedMessage, UserDirectory};
use medibot_intent::classify;
use medibot_whatsapp::{normalize, phone_from_jid};

use crate::replies;

/// Why an event produced no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IgnoreReason {
    #[strum(serialize = "body too large")]
    BodyTooLarge,
    #[strum(serialize = "unreadable body")]
    UnreadableBody,
    #[strum(serialize = "invalid json")]
    InvalidJson,
    #[strum(serialize = "not a message event")]
    NotAMessageEvent,
    #[strum(serialize = "no sender")]
    NoSender,
    #[strum(serialize = "self")]
    FromSelf,
    #[strum(serialize = "group")]
    GroupChat,
    #[strum(serialize = "empty or non-text")]
    EmptyOrNonText,
    #[strum(serialize = "non-medical question")]
    NonMedical,
}

/// Fate of a best-effort notice to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStatus {
    Notified,
    NotifyFailed,
    /// No notice was sent (the failed step was itself the reply).
    NotAttempted,
}

/// Terminal state of one webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Ignored(IgnoreReason),
    GreetingReplied,
    RejectionReplied,
    MedicalAnswered,
    MedicalAnswerEmpty,
    UpstreamFailed(NoticeStatus),
    InternalError(NoticeStatus),
}

impl WebhookOutcome {
    /// `success`, `ignored` or `error`.
    pub fn status(&self) -> &'static str {
        match self {
            WebhookOutcome::GreetingReplied | WebhookOutcome::MedicalAnswered => "success",
            WebhookOutcome::Ignored(_)
            | WebhookOutcome::RejectionReplied
            | WebhookOutcome::MedicalAnswerEmpty => "ignored",
            WebhookOutcome::UpstreamFailed(_) | WebhookOutcome::InternalError(_) => "error",
        }
    }

    pub fn reason(&self) -> String {
        match self {
            WebhookOutcome::Ignored(reason) => reason.to_string(),
            WebhookOutcome::GreetingReplied => "greeting sent".into(),
            WebhookOutcome::RejectionReplied => IgnoreReason::NonMedical.to_string(),
            WebhookOutcome::MedicalAnswered => "answer sent".into(),
            WebhookOutcome::MedicalAnswerEmpty => "empty answer".into(),
            WebhookOutcome::UpstreamFailed(notice) => with_notice("retrieval failed", *notice),
            WebhookOutcome::InternalError(notice) => with_notice("internal error", *notice),
        }
    }

    pub fn to_response(&self) -> WebhookResponse {
        WebhookResponse {
            status: self.status(),
            reason: self.reason(),
        }
    }
}

fn with_notice(base: &str, notice: NoticeStatus) -> String {
    match notice {
        NoticeStatus::Notified => format!("{base}; user notified"),
        NoticeStatus::NotifyFailed => format!("{base}; notice not delivered"),
        NoticeStatus::NotAttempted => base.to_string(),
    }
}

/// JSON body acknowledging a webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub reason: String,
}

/// Filtered message ready for routing.
struct Accepted<'a> {
    sender: &'a str,
    text: &'a str,
    display_name: Option<&'a str>,
}

/// Per-process orchestrator. Holds only immutable shared handles.
pub struct WebhookHandler {
    messenger: Arc<dyn Messenger>,
    retriever: Arc<dyn AnswerRetriever>,
    directory: Option<Arc<dyn UserDirectory>>,
    config: HandlerConfig,
}

impl WebhookHandler {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        retriever: Arc<dyn AnswerRetriever>,
        config: HandlerConfig,
    ) -> Self {
        Self {
            messenger,
            retriever,
            directory: None,
            config,
        }
    }

    /// Records every accepted sender in `directory`.
    pub fn with_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Handles a raw webhook body. Never fails.
    pub async fn handle(&self, body: &[u8]) -> WebhookOutcome {
        let outcome = match serde_json::from_slice::<Value>(body) {
            Ok(payload) => self.handle_value(&payload).await,
            Err(e) => {
                debug!(error = %e, "webhook body is not JSON");
                WebhookOutcome::Ignored(IgnoreReason::InvalidJson)
            }
        };
        info!(status = outcome.status(), reason = %outcome.reason(), "webhook handled");
        outcome
    }

    /// Handles an already-parsed webhook body.
    pub async fn handle_value(&self, payload: &Value) -> WebhookOutcome {
        let Some(message) = normalize(payload) else {
            return WebhookOutcome::Ignored(IgnoreReason::NotAMessageEvent);
        };
        let accepted = match filter(&message) {
            Ok(accepted) => accepted,
            Err(reason) => return WebhookOutcome::Ignored(reason),
        };
        debug!(
            message_id = message.message_id.as_deref().unwrap_or("-"),
            chars = accepted.text.chars().count(),
            "message accepted"
        );

        self.record_contact(&accepted).await;

        match AssertUnwindSafe(self.route(&accepted)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                error!(panic = panic_message(panic.as_ref()), "message routing panicked");
                let notice = self.notify(accepted.sender, replies::GENERIC_ERROR).await;
                WebhookOutcome::InternalError(notice)
            }
        }
    }

    async fn route(&self, msg: &Accepted<'_>) -> WebhookOutcome {
        let intent = classify(msg.text);

        if intent.is_greeting {
            let welcome = replies::welcome(msg.display_name, &self.config.bot_name);
            return self.reply(msg.sender, &welcome, WebhookOutcome::GreetingReplied).await;
        }

        if !intent.is_medical {
            if !self.config.reject_non_medical {
                return WebhookOutcome::Ignored(IgnoreReason::NonMedical);
            }
            if self.notify(msg.sender, replies::REJECTION).await == NoticeStatus::NotifyFailed {
                warn!("rejection notice not delivered");
            }
            return WebhookOutcome::RejectionReplied;
        }

        match self.retriever.retrieve(msg.text).await {
            Err(e) => {
                error!(error = %e, retriever = self.retriever.name(), "answer retrieval failed");
                let notice = self.notify(msg.sender, replies::MAINTENANCE).await;
                WebhookOutcome::UpstreamFailed(notice)
            }
            Ok(answer) if answer.is_empty() => {
                info!("retriever returned an empty answer, nothing to send");
                WebhookOutcome::MedicalAnswerEmpty
            }
            Ok(answer) => {
                self.reply(msg.sender, &answer.text, WebhookOutcome::MedicalAnswered)
                    .await
            }
        }
    }

    /// Sends a primary reply; a failed send is terminal and not retried.
    async fn reply(&self, to: &str, text: &str, on_success: WebhookOutcome) -> WebhookOutcome {
        match self.messenger.send(to, text).await {
            Ok(receipt) => {
                debug!(
                    status = receipt.status,
                    message_id = ?receipt.message_id,
                    "reply delivered"
                );
                on_success
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "reply delivery failed");
                WebhookOutcome::InternalError(NoticeStatus::NotAttempted)
            }
        }
    }

    /// Best-effort send; failure is logged only.
    async fn notify(&self, to: &str, text: &str) -> NoticeStatus {
        match self.messenger.send(to, text).await {
            Ok(_) => NoticeStatus::Notified,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "notice delivery failed");
                NoticeStatus::NotifyFailed
            }
        }
    }

    async fn record_contact(&self, msg: &Accepted<'_>) {
        let Some(directory) = &self.directory else {
            return;
        };
        let Some(phone) = phone_from_jid(msg.sender) else {
            return;
        };
        if let Err(e) = directory.record_contact(&phone, msg.display_name).await {
            warn!(error = %e, "failed to record contact");
        }
    }
}

/// Applies the sender, self, group and text filters in that order.
fn filter(message: &NormalizedMessage) -> Result<Accepted<'_>, IgnoreReason> {
    let sender = message.sender_id.as_deref().ok_or(IgnoreReason::NoSender)?;
    if message.is_from_self {
        return Err(IgnoreReason::FromSelf);
    }
    if message.is_group_chat {
        return Err(IgnoreReason::GroupChat);
    }
    let text = message
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(IgnoreReason::EmptyOrNonText)?;
    Ok(Accepted {
        sender,
        text,
        display_name: message.display_name.as_deref(),
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
