// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification for inbound chat messages.
//!
//! Two independent predicates over the trimmed, lowercased text:
//! - [`is_greeting`]: the whole message is one of a short list of greetings
//! - [`is_medical`]: a medical keyword appears anywhere, or the message opens
//!   with a typical health-question phrase
//!
//! Both are keyword heuristics with no network and no model. Borderline text
//! leaning medical is accepted; anything else gets a polite rejection from
//! the webhook handler rather than a silent drop.

pub mod classifier;

pub use classifier::{classify, is_greeting, is_medical, MIN_MEDICAL_LEN};
