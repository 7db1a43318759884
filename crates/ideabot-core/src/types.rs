// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the ideabot workspace.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
    Executor,
}

/// One inbound chat message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatEvent {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub is_bot: bool,
    pub is_command: bool,
    /// Command name without the leading slash or `@bot` suffix.
    pub command_name: Option<String>,
    pub command_args: Option<String>,
    /// Set by transports that know the chat kind. `None` falls back to the
    /// positive-chat-id convention for direct conversations.
    pub is_direct: Option<bool>,
}

impl ChatEvent {
    /// Builds a plain text event, parsing a leading `/command` if present.
    pub fn text(chat_id: i64, user_id: i64, username: &str, text: &str) -> Self {
        let command = parse_command(text);
        Self {
            chat_id,
            user_id,
            username: username.to_string(),
            text: text.to_string(),
            is_bot: false,
            is_command: command.is_some(),
            command_name: command.as_ref().map(|(name, _)| name.clone()),
            command_args: command.map(|(_, args)| args),
            is_direct: None,
        }
    }

    /// Whether this event comes from a one-to-one conversation.
    pub fn is_direct_chat(&self) -> bool {
        self.is_direct.unwrap_or(self.chat_id > 0)
    }
}

/// Splits `/name@bot args...` into `("name", "args...")`.
///
/// Returns `None` when the text does not start with a slash followed by a name.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.find(char::is_whitespace) {
        Some(pos) => (&rest[..pos], rest[pos..].trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), args.to_string()))
}

/// Coarse intent tag assigned by the classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Issue,
    FeatureRequest,
    Question,
    Message,
}

impl Category {
    /// The persisted autoreply category that corresponds to this tag, if any.
    pub fn table_family(&self) -> Option<&'static str> {
        match self {
            Category::Issue => Some("issue"),
            Category::FeatureRequest => Some("feature"),
            Category::Question => Some("question"),
            Category::Message => None,
        }
    }
}

/// Append-only audit entry, written once per inbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
    pub is_bot: bool,
    pub category: Category,
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    /// Builds the audit record for an event with the current timestamp.
    pub fn from_event(event: &ChatEvent, category: Category) -> Self {
        Self {
            chat_id: event.chat_id,
            user_id: event.user_id,
            username: event.username.clone(),
            text: event.text.clone(),
            is_bot: event.is_bot,
            category,
            timestamp: Utc::now(),
        }
    }
}

/// A canned reply entry of the persisted autoreply table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoReply {
    pub id: i64,
    pub category: String,
    pub reply: String,
    /// Documentation only.
    #[serde(default)]
    pub context: String,
}

/// Credentials for one registered bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    pub id: String,
    pub token: String,
}

/// Live routing configuration, persisted as JSON and mutable at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub default_bot_id: String,
    #[serde(default)]
    pub bots: BTreeMap<String, BotConfig>,
    #[serde(default)]
    pub default_ai_model: String,
    #[serde(default)]
    pub default_ai_prompt: String,
}

impl RoutingConfig {
    /// The configured model, or `fallback` when unset.
    pub fn effective_model<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.default_ai_model.trim().is_empty() {
            fallback
        } else {
            &self.default_ai_model
        }
    }

    /// The configured prompt, or `fallback` when unset.
    pub fn effective_prompt<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.default_ai_prompt.trim().is_empty() {
            fallback
        } else {
            &self.default_ai_prompt
        }
    }

    /// The default bot entry, if one is configured.
    pub fn default_bot(&self) -> Option<&BotConfig> {
        if self.default_bot_id.is_empty() {
            return None;
        }
        self.bots.get(&self.default_bot_id)
    }
}

/// Kind of long-running work tracked by the task queue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Ai,
    Command,
}

/// Lifecycle state of a tracked task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl TaskStatus {
    /// `done` and `error` are terminal.
    pub fn is_active(&self) -> bool {
        !matches!(self, TaskStatus::Done | TaskStatus::Error)
    }
}

/// A durable record of a queued or running task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessTask {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub user: String,
    pub chat_id: i64,
    pub created_at: DateTime<Utc>,
    pub status: TaskStatus,
    #[serde(default)]
    pub info: String,
}

impl ProcessTask {
    /// Creates a queued task with a fresh collision-resistant id.
    pub fn queued(task_type: TaskType, user: &str, chat_id: i64, info: &str) -> Self {
        Self {
            id: Self::new_id(),
            task_type,
            user: user.to_string(),
            chat_id,
            created_at: Utc::now(),
            status: TaskStatus::Queued,
            info: info.to_string(),
        }
    }

    /// Generates an id from the timestamp, process id, and a random component.
    pub fn new_id() -> String {
        format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            std::process::id(),
            uuid::Uuid::new_v4().simple()
        )
    }
}

/// A reply to deliver through the reply sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: i64,
    pub text: String,
}

/// Result of running a tokenized command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Combined stdout and stderr.
    pub output: String,
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_splits_name_and_args() {
        assert_eq!(
            parse_command("/run ls -la"),
            Some(("run".to_string(), "ls -la".to_string()))
        );
        assert_eq!(
            parse_command("/status@ideabglobe_bot"),
            Some(("status".to_string(), String::new()))
        );
        assert_eq!(parse_command("hello /run"), None);
        assert_eq!(parse_command("/ "), None);
    }

    #[test]
    fn text_event_marks_commands() {
        let event = ChatEvent::text(1, 2, "alice", "/run ls -la");
        assert!(event.is_command);
        assert_eq!(event.command_name.as_deref(), Some("run"));
        assert_eq!(event.command_args.as_deref(), Some("ls -la"));

        let plain = ChatEvent::text(1, 2, "alice", "hi there");
        assert!(!plain.is_command);
        assert!(plain.command_name.is_none());
    }

    #[test]
    fn direct_chat_falls_back_to_chat_id_sign() {
        let mut event = ChatEvent::text(-100, 2, "alice", "hi");
        assert!(!event.is_direct_chat());
        event.chat_id = 42;
        assert!(event.is_direct_chat());
        event.is_direct = Some(false);
        assert!(!event.is_direct_chat());
    }

    #[test]
    fn category_serializes_snake_case() {
        assert_eq!(Category::FeatureRequest.to_string(), "feature_request");
        let json = serde_json::to_string(&Category::FeatureRequest).unwrap();
        assert_eq!(json, "\"feature_request\"");
        assert_eq!(Category::Message.table_family(), None);
        assert_eq!(Category::FeatureRequest.table_family(), Some("feature"));
    }

    #[test]
    fn routing_config_tolerates_missing_fields() {
        let cfg: RoutingConfig = serde_json::from_str(r#"{"default_bot_id":"main"}"#).unwrap();
        assert!(cfg.bots.is_empty());
        assert_eq!(cfg.effective_model("llama3"), "llama3");
        assert!(cfg.default_bot().is_none());
    }

    #[test]
    fn process_task_serializes_type_field() {
        let task = ProcessTask::queued(TaskType::Command, "alice", 7, "ls");
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["type"], "command");
        assert_eq!(value["status"], "queued");
        assert!(task.status.is_active());
    }

    #[test]
    fn task_ids_are_distinct() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| ProcessTask::new_id()).collect();
        assert_eq!(ids.len(), 100);
    }
}
