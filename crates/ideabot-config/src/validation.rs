// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::IdeabotConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &IdeabotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.agent.data_dir.trim().is_empty() {
        fail("agent.data_dir must not be empty".to_string());
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let trigger = config.agent.ai_trigger.trim();
    if trigger.is_empty() || trigger.contains(char::is_whitespace) {
        fail("agent.ai_trigger must be a single non-empty token".to_string());
    }

    if config.agent.default_model.trim().is_empty() {
        fail("agent.default_model must not be empty".to_string());
    }

    if config.agent.mentions.iter().any(|m| m.trim().is_empty()) {
        fail("agent.mentions must not contain empty entries".to_string());
    }

    if let Some(path) = &config.storage.database_path
        && path.trim().is_empty()
    {
        fail("storage.database_path must not be empty when set".to_string());
    }

    if !config.ollama.base_url.starts_with("http://")
        && !config.ollama.base_url.starts_with("https://")
    {
        fail(format!(
            "ollama.base_url `{}` must start with http:// or https://",
            config.ollama.base_url
        ));
    }

    if config.ollama.timeout_secs == 0 {
        fail("ollama.timeout_secs must be greater than 0".to_string());
    }

    if config.shell.timeout_secs == 0 {
        fail("shell.timeout_secs must be greater than 0".to_string());
    }

    if config.shell.max_output_bytes == 0 {
        fail("shell.max_output_bytes must be greater than 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&IdeabotConfig::default()).is_ok());
    }

    #[test]
    fn multi_word_trigger_fails() {
        let mut config = IdeabotConfig::default();
        config.agent.ai_trigger = "hey bot".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "ai_trigger"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = IdeabotConfig::default();
        config.agent.log_level = "loud".into();
        config.ollama.timeout_secs = 0;
        config.shell.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "log_level"));
        assert!(has_error(&errors, "ollama.timeout_secs"));
        assert!(has_error(&errors, "shell.timeout_secs"));
    }

    #[test]
    fn bad_base_url_fails() {
        let mut config = IdeabotConfig::default();
        config.ollama.base_url = "localhost:11434".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "base_url"));
    }
}
