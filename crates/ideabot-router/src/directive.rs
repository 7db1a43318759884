// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-chat directives and the explicit AI trigger token.

use std::sync::LazyLock;

use regex::Regex;

/// `/ai ollama model set <name>`, leading slash optional, case-insensitive.
static SET_MODEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\s)/?ai\s+ollama\s+model\s+set\s+([A-Za-z0-9_-]+)(?:\s|$)").unwrap()
});

/// Extracts the model name from a "set AI model" directive, if present.
pub fn parse_set_model(text: &str) -> Option<String> {
    SET_MODEL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether `text` contains `trigger` as a standalone token.
///
/// Matching is case-insensitive; a `@botname` suffix and trailing
/// punctuation on the token are ignored.
pub fn contains_trigger(text: &str, trigger: &str) -> bool {
    if trigger.is_empty() {
        return false;
    }
    text.split_whitespace().any(|token| {
        let token = token.trim_end_matches([',', '.', ':', ';', '!', '?']);
        let Some(head) = token.get(..trigger.len()) else {
            return false;
        };
        head.eq_ignore_ascii_case(trigger)
            && (token.len() == trigger.len() || token[trigger.len()..].starts_with('@'))
    })
}
