// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword and prefix heuristics for greeting / medical detection.

use medibot_core::ClassificationResult;
use tracing::trace;

/// Messages shorter than this (in characters) are only medical if they hit a keyword.
pub const MIN_MEDICAL_LEN: usize = 5;

/// Whole-message greetings (exact match after normalization).
const GREETINGS: &[&str] = &[
    "hi",
    "hii",
    "hello",
    "hey",
    "hola",
    "howdy",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "salam",
    "start",
];

/// Keywords this short must match a whole word (see [`contains_keyword`]).
const SHORT_KEYWORD_LEN: usize = 4;

/// Endings a short keyword may carry and still count as the same word.
const SHORT_KEYWORD_SUFFIXES: &[&str] = &["", "s", "es", "y", "d", "ed", "ing", "ful", "ness"];

/// Medical vocabulary. Longer entries match as substrings, so stems cover
/// inflections: `pregnan` matches pregnant and pregnancy, `diarrh` both
/// spellings.
const MEDICAL_KEYWORDS: &[&str] = &[
    "symptom",
    "fever",
    "cough",
    "pain",
    "ache",
    "headache",
    "toothache",
    "backache",
    "earache",
    "sore",
    "malaria",
    "typhoid",
    "cholera",
    "tuberculosis",
    "diabetes",
    "hypertension",
    "blood pressure",
    "asthma",
    "cancer",
    "hiv",
    "covid",
    "flu",
    "infection",
    "disease",
    "doctor",
    "nurse",
    "hospital",
    "clinic",
    "medicine",
    "medication",
    "drug",
    "tablet",
    "dose",
    "dosage",
    "treatment",
    "cure",
    "vaccin",
    "pregnan",
    "diarrh",
    "vomit",
    "nausea",
    "rash",
    "itch",
    "allerg",
    "dizzy",
    "dizziness",
    "swell",
    "swollen",
    "bleed",
    "wound",
    "injur",
    "health",
    "sick",
    "breath",
    "stomach",
    "heart",
    "kidney",
    "liver",
    "nutrition",
];

/// Health-question openers (prefix match).
const QUESTION_PREFIXES: &[&str] = &[
    "what is",
    "what are",
    "what causes",
    "what should i",
    "how do i",
    "how can i",
    "how to",
    "how long",
    "is it safe",
    "is it normal",
    "should i",
    "can i take",
    "can i eat",
    "why do i",
    "why does my",
    "when should i",
];

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Substring match for long keywords. Short ones must start a word and end
/// it, allowing one of [`SHORT_KEYWORD_SUFFIXES`], so `flu` and `flus` hit
/// but `fluent` and `influence` do not.
fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.len() > SHORT_KEYWORD_LEN {
        return text.contains(keyword);
    }
    text.match_indices(keyword).any(|(start, _)| {
        let starts_word = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let rest = &text[start + keyword.len()..];
        let word_end = rest
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or(rest.len());
        starts_word && SHORT_KEYWORD_SUFFIXES.contains(&&rest[..word_end])
    })
}

/// True iff the whole message is a greeting, ignoring case, surrounding
/// whitespace and trailing `!`/`.`.
pub fn is_greeting(text: &str) -> bool {
    let lower = normalize(text);
    let bare = lower.trim_end_matches(['!', '.']).trim_end();
    GREETINGS.contains(&bare)
}

/// True iff the message looks like a health question.
pub fn is_medical(text: &str) -> bool {
    let lower = normalize(text);

    if let Some(keyword) = MEDICAL_KEYWORDS
        .iter()
        .find(|k| contains_keyword(&lower, k))
    {
        trace!(keyword, "medical keyword matched");
        return true;
    }

    if lower.chars().count() < MIN_MEDICAL_LEN {
        return false;
    }

    if let Some(prefix) = QUESTION_PREFIXES.iter().find(|p| lower.starts_with(*p)) {
        trace!(prefix, "health question prefix matched");
        return true;
    }

    false
}

/// Runs both predicates.
pub fn classify(text: &str) -> ClassificationResult {
    ClassificationResult {
        is_greeting: is_greeting(text),
        is_medical: is_medical(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn greetings_match_whole_message_only() {
        assert!(is_greeting("hi"));
        assert!(is_greeting("Hello"));
        assert!(is_greeting("  hey  "));
        assert!(is_greeting("Good Morning!"));
        assert!(!is_greeting("hi there"));
        assert!(!is_greeting("hiya"));
        assert!(!is_greeting(""));
    }

    #[test]
    fn medical_keywords_match() {
        assert!(is_medical("What are the symptoms of malaria?"));
        assert!(is_medical("I have a fever and cough, what should I do?"));
        assert!(is_medical("my child has DIARRHEA since yesterday"));
        assert!(is_medical("Is she pregnant if she misses her period?"));
    }

    #[test]
    fn question_prefixes_match() {
        assert!(is_medical("how long does it take to recover from a cold"));
        assert!(is_medical("Is it safe to take paracetamol twice"));
    }

    #[test]
    fn non_medical_text_is_rejected() {
        assert!(!is_medical("ok thanks"));
        assert!(!is_medical("what's the weather"));
        assert!(!is_medical("hi there"));
        assert!(!is_medical("yes"));
    }

    #[test]
    fn short_keywords_do_not_match_inside_other_words() {
        assert!(!is_medical("my teacher is strict"));
        assert!(!is_medical("I am moving to Spain"));
        assert!(!is_medical("please archive this chat"));
        assert!(!is_medical("is this link secure"));
        assert!(!is_medical("I am fluent in French"));
    }

    #[test]
    fn short_keywords_match_with_common_endings() {
        assert!(is_medical("my knee is painful"));
        assert!(is_medical("itchy eyes every morning"));
        assert!(is_medical("body aches at night"));
        assert!(is_medical("I had the flu, now sore throat"));
        assert!(is_medical("I have a headache"));
        assert!(is_medical("feeling dizzy after standing"));
    }

    #[test]
    fn short_text_needs_a_keyword() {
        assert!(!is_medical("why?"));
        assert!(is_medical("flu"));
    }

    #[test]
    fn classify_combines_predicates() {
        let greeting = classify("hello");
        assert!(greeting.is_greeting);
        assert!(!greeting.is_medical);

        let medical = classify("what causes high blood pressure");
        assert!(!medical.is_greeting);
        assert!(medical.is_medical);
    }

    proptest! {
        #[test]
        fn greeting_followed_by_words_is_not_greeting(
            idx in 0..GREETINGS.len(),
            tail in "[a-z]{1,10}",
        ) {
            let text = format!("{} {tail}", GREETINGS[idx]);
            prop_assume!(!GREETINGS.contains(&text.as_str()));
            prop_assert!(!is_greeting(&text));
        }

        #[test]
        fn classification_ignores_case_and_padding(
            idx in 0..MEDICAL_KEYWORDS.len(),
            pad in " {0,4}",
        ) {
            let text = format!("{pad}{}{pad}", MEDICAL_KEYWORDS[idx].to_uppercase());
            prop_assert!(is_medical(&text));
        }
    }
}
