// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for ideabot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File name of the live routing configuration inside the data directory.
pub const ROUTING_FILE: &str = "configs.json";

/// File name of the persisted autoreply table inside the data directory.
pub const AUTOREPLY_FILE: &str = "auto.json";

/// File name of the task queue inside the data directory.
pub const TASKS_FILE: &str = "process.json";

/// File name of the audit database inside the data directory.
pub const DATABASE_FILE: &str = "data.db";

/// Top-level process configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdeabotConfig {
    /// Bot identity, triggers, and AI defaults.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Ollama backend settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Audit storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Chat-triggered shell execution settings.
    #[serde(default)]
    pub shell: ShellConfig,
}

impl IdeabotConfig {
    /// Directory holding the JSON stores and the audit database.
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.agent.data_dir)
    }

    /// Path of the live routing configuration file.
    pub fn routing_path(&self) -> PathBuf {
        self.data_dir().join(ROUTING_FILE)
    }

    /// Path of the persisted autoreply table.
    pub fn autoreply_path(&self) -> PathBuf {
        self.data_dir().join(AUTOREPLY_FILE)
    }

    /// Path of the durable task queue.
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir().join(TASKS_FILE)
    }

    /// Path of the audit database, defaulting into the data directory.
    pub fn database_path(&self) -> PathBuf {
        match &self.storage.database_path {
            Some(path) => PathBuf::from(path),
            None => self.data_dir().join(DATABASE_FILE),
        }
    }
}

/// Bot identity and routing behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for `configs.json`, `auto.json`, `process.json`, and `data.db`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Mention tokens that address the bot in group chats.
    #[serde(default = "default_mentions")]
    pub mentions: Vec<String>,

    /// Token that explicitly invokes the AI responder.
    #[serde(default = "default_ai_trigger")]
    pub ai_trigger: String,

    /// Model used when the routing configuration does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Prompt used when the routing configuration does not define one.
    #[serde(default = "default_prompt")]
    pub default_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            data_dir: default_data_dir(),
            mentions: default_mentions(),
            ai_trigger: default_ai_trigger(),
            default_model: default_model(),
            default_prompt: default_prompt(),
        }
    }
}

fn default_agent_name() -> String {
    "ideabot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> String {
    dirs::home_dir()
        .map(|p| p.join(".ideasbglobe"))
        .unwrap_or_else(|| PathBuf::from(".ideasbglobe"))
        .to_string_lossy()
        .into_owned()
}

fn default_mentions() -> Vec<String> {
    vec!["@ideabglobe_bot".to_string(), "@ideabglobe".to_string()]
}

fn default_ai_trigger() -> String {
    "/ai".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_prompt() -> String {
    "You are a software engineering assistant bot in a Telegram group. Be concise and helpful."
        .to_string()
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Overrides the token of the default bot from `configs.json`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user IDs or usernames allowed to talk to the bot. Empty allows everyone.
    #[serde(default)]
    pub allowed_users: Vec<String>,

    /// Long polling timeout in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            allowed_users: Vec::new(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

fn default_poll_timeout() -> u32 {
    60
}

/// Ollama backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the Ollama HTTP API.
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_ollama_timeout")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            timeout_secs: default_ollama_timeout(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_timeout() -> u64 {
    120
}

/// Audit storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database. Defaults to `<data_dir>/data.db`.
    #[serde(default)]
    pub database_path: Option<String>,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_wal_mode() -> bool {
    true
}

/// Shell execution gate for the `run` command.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Whether `run` may execute anything at all.
    #[serde(default = "default_shell_enabled")]
    pub enabled: bool,

    /// Program names that may be executed. Empty allows any program.
    #[serde(default)]
    pub allowed_commands: Vec<String>,

    /// Usernames or user IDs allowed to run commands. Empty allows everyone.
    #[serde(default)]
    pub allowed_users: Vec<String>,

    /// Execution timeout in seconds. The child is killed when it expires.
    #[serde(default = "default_shell_timeout")]
    pub timeout_secs: u64,

    /// Maximum bytes of output relayed back to the chat.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            enabled: default_shell_enabled(),
            allowed_commands: Vec::new(),
            allowed_users: Vec::new(),
            timeout_secs: default_shell_timeout(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

impl ShellConfig {
    /// True when neither programs nor users are restricted.
    pub fn is_unrestricted(&self) -> bool {
        self.enabled && self.allowed_commands.is_empty() && self.allowed_users.is_empty()
    }
}

fn default_shell_enabled() -> bool {
    true
}

fn default_shell_timeout() -> u64 {
    60
}

fn default_max_output_bytes() -> usize {
    3500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_live_in_data_dir() {
        let mut config = IdeabotConfig::default();
        config.agent.data_dir = "/tmp/ideabot".into();
        assert_eq!(config.routing_path(), PathBuf::from("/tmp/ideabot/configs.json"));
        assert_eq!(config.autoreply_path(), PathBuf::from("/tmp/ideabot/auto.json"));
        assert_eq!(config.tasks_path(), PathBuf::from("/tmp/ideabot/process.json"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/ideabot/data.db"));
    }

    #[test]
    fn explicit_database_path_wins() {
        let mut config = IdeabotConfig::default();
        config.storage.database_path = Some("/var/lib/ideabot.db".into());
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/ideabot.db"));
    }

    #[test]
    fn shell_defaults_are_unrestricted() {
        let shell = ShellConfig::default();
        assert!(shell.is_unrestricted());
        let gated = ShellConfig {
            allowed_commands: vec!["ls".into()],
            ..ShellConfig::default()
        };
        assert!(!gated.is_unrestricted());
    }
}
