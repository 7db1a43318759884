// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization filtering and conversion of Telegram messages into
//! [`ChatEvent`]s.

use ideabot_core::ChatEvent;
use teloxide::types::{ChatKind, Message};

/// Whether the sender may talk to the bot.
///
/// An empty `allowed_users` list admits everyone. Otherwise the sender's
/// numeric id or username (with or without `@`, case-insensitive) must be
/// listed. Messages without a sender pass only when the list is empty.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return true;
    }
    let Some(user) = msg.from.as_ref() else {
        return false;
    };

    let user_id = user.id.0.to_string();
    allowed_users.iter().any(|allowed| {
        if *allowed == user_id {
            return true;
        }
        let wanted = allowed.strip_prefix('@').unwrap_or(allowed);
        user.username
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
    })
}

pub fn is_direct(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Converts a message into a [`ChatEvent`].
///
/// The username falls back to the sender's first name. Text falls back to
/// the caption, then to the empty string. Returns `None` for messages
/// without a sender (channel posts).
pub fn to_chat_event(msg: &Message) -> Option<ChatEvent> {
    let user = msg.from.as_ref()?;
    let username = match user.username.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => user.first_name.as_str(),
    };
    let text = msg.text().or_else(|| msg.caption()).unwrap_or_default();

    Some(ChatEvent {
        is_bot: user.is_bot,
        is_direct: Some(is_direct(msg)),
        ..ChatEvent::text(msg.chat.id.0, user.id.0 as i64, username, text)
    })
}
