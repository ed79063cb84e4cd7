// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed user-facing reply texts.

/// Used when the sender has no display name.
pub const GENERIC_NAME: &str = "there";

pub const REJECTION: &str = "Sorry, I can only help with health and medical questions. \
Please ask me about symptoms, illnesses, medicines or staying healthy.";

pub const MAINTENANCE: &str = "Sorry, our health information service is under maintenance \
right now. Please try again in a little while.";

pub const GENERIC_ERROR: &str =
    "Sorry, something went wrong while handling your message. Please try again later.";

/// Welcome message for a greeting, personalized when a name is known.
pub fn welcome(display_name: Option<&str>, bot_name: &str) -> String {
    let name = display_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(GENERIC_NAME);
    format!(
        "Hello {name}! I'm {bot_name}, your health information assistant. \
Ask me any health question, for example \"What are the symptoms of malaria?\". \
I share general information only, not a diagnosis."
    )
}
