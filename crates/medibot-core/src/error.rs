// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Medibot.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across adapter traits and the webhook pipeline.
#[derive(Debug, Error)]
pub enum MedibotError {
    /// Configuration errors (missing credentials, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound message delivery through the chat gateway failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The answer retriever could not produce an answer.
    #[error("retrieval failed: {message}")]
    Retrieval {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A hosted model or vector index call failed (network, non-2xx, bad body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure of a single outbound send through the chat gateway.
///
/// Transport problems and gateway-side rejections are kept apart so operators
/// can tell a network issue from an expired gateway session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Connection refused, DNS failure, TLS failure, or a broken response stream.
    #[error("could not reach the chat gateway ({message}); check network connectivity to the gateway")]
    Transport { message: String },

    /// The gateway did not answer within the client timeout.
    #[error("chat gateway did not respond within {after:?}; check network connectivity to the gateway")]
    Timeout { after: Duration },

    /// The gateway answered with a non-2xx status. `body` is kept verbatim.
    #[error("chat gateway rejected the message with HTTP {status}: {body}; check that the gateway session is active")]
    Http { status: u16, body: String },
}

impl DeliveryError {
    /// Short machine-friendly label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryError::Transport { .. } => "transport",
            DeliveryError::Timeout { .. } => "timeout",
            DeliveryError::Http { .. } => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_body_and_names_remediation() {
        let err = DeliveryError::Http {
            status: 403,
            body: r#"{"error":"not authorized"}"#.into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains(r#"{"error":"not authorized"}"#));
        assert!(msg.contains("gateway session is active"));
        assert_eq!(err.kind(), "http");
    }

    #[test]
    fn transport_and_timeout_point_at_connectivity() {
        let transport = DeliveryError::Transport {
            message: "connection refused".into(),
        };
        let timeout = DeliveryError::Timeout {
            after: Duration::from_secs(10),
        };
        assert!(transport.to_string().contains("network connectivity"));
        assert!(timeout.to_string().contains("network connectivity"));
        assert_eq!(transport.kind(), "transport");
        assert_eq!(timeout.kind(), "timeout");
    }

    #[test]
    fn delivery_variant_is_transparent() {
        let err = MedibotError::from(DeliveryError::Transport {
            message: "dns".into(),
        });
        assert!(err.to_string().starts_with("could not reach the chat gateway"));
    }
}
