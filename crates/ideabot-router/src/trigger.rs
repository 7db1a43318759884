// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whether an ordinary (non-command, non-directive) message deserves a reply.

use ideabot_core::{AutoReply, Category, ChatEvent};

/// Returns true if any of these hold:
/// - the bot is mentioned (case-insensitive)
/// - the chat is a direct conversation
/// - the text contains a question mark
/// - the text looks like a command (`/...`)
/// - the category's keyword family exists in the persisted autoreply table
pub fn should_respond(
    event: &ChatEvent,
    category: Category,
    mentions: &[String],
    table: &[AutoReply],
) -> bool {
    let lower = event.text.to_lowercase();
    let mentioned = mentions
        .iter()
        .any(|m| !m.is_empty() && lower.contains(&m.to_lowercase()));
    let has_question = event.text.contains('?');
    let looks_like_command = event.text.trim_start().starts_with('/');
    let known_family = category
        .table_family()
        .is_some_and(|family| table.iter().any(|r| r.category == family));

    mentioned || event.is_direct_chat() || has_question || looks_like_command || known_family
}
