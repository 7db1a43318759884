// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static canned replies used when the AI responder is unavailable.
//!
//! This table is compiled in and is distinct from the persisted autoreply
//! table, which only decides whether the bot speaks up.

const ISSUE: &[&str] = &[
    "🐛 I see you've mentioned an issue. Can you provide more details?",
    "📝 Please create a detailed issue report with steps to reproduce.",
    "🔍 Let me help you troubleshoot this problem.",
];

const FEATURE_REQUEST: &[&str] = &[
    "💡 Interesting feature idea! Let's discuss the requirements.",
    "🚀 That sounds like a useful enhancement. Can you elaborate?",
    "📋 I'll help you draft a proper feature request.",
];

const QUESTION: &[&str] = &[
    "🤔 Good question! Let me think about this...",
    "📚 I can help you with that. Here's what I know:",
    "💭 Interesting question. Let me research that for you.",
];

const DEFAULT: &[&str] = &[
    "👍 Noted! I'm tracking this conversation.",
    "📊 I'm here to help with software engineering tasks.",
    "🤖 How can I assist with your development work?",
];

/// Picks the canned reply for `category`, falling back to the default set.
///
/// The index is `len % 3`, so with three candidates the first entry is
/// always chosen.
pub fn fallback_reply(category: &str) -> &'static str {
    let candidates = match category {
        "issue" => ISSUE,
        "feature_request" => FEATURE_REQUEST,
        "question" => QUESTION,
        _ => DEFAULT,
    };
    candidates[candidates.len() % 3]
}
