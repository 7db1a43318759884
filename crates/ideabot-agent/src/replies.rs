// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-visible reply texts.

use ideabot_core::{CommandOutput, IdeabotError};

pub const STATUS_REPLY: &str = "🤖 Bot is running and tracking conversations.";

pub fn acknowledge(command: &str) -> String {
    format!("⚡ Command processed: /{command}")
}

/// Confirmation for a model change. A failed persist is reported inline.
pub fn model_set(model: &str, persist_error: Option<&IdeabotError>) -> String {
    match persist_error {
        None => format!("✅ AI model set to {model}"),
        Some(e) => format!("✅ AI model set to {model} (not persisted: {e})"),
    }
}

pub fn ai_error(err: &IdeabotError) -> String {
    format!("[AI error] {}", error_text(err))
}

/// Formats a shell execution outcome.
pub fn shell_result(result: &Result<CommandOutput, IdeabotError>) -> String {
    match result {
        Ok(out) if out.success => format!("💻 Output:\n{}", out.output),
        Ok(out) => {
            let reason = match out.exit_code {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            };
            if out.output.is_empty() {
                format!("❌ Error: {reason}")
            } else {
                format!("❌ Error: {reason}\n{}", out.output)
            }
        }
        Err(e) => format!("❌ Error: {}", error_text(e)),
    }
}

/// Execution errors are shown without the variant prefix.
fn error_text(err: &IdeabotError) -> String {
    match err {
        IdeabotError::Execution { message } => message.clone(),
        IdeabotError::Provider { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
