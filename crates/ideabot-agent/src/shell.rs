// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gated execution of chat-supplied command lines.
//!
//! The command line is split on whitespace: the first token is the program,
//! the rest are arguments. No shell is involved, so pipes, globs, and
//! quoting have no special meaning.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use ideabot_config::model::ShellConfig;
use ideabot_core::{CommandExecutor, CommandOutput, IdeabotError};
use tokio::process::Command;
use tracing::{debug, warn};

const TRUNCATION_MARKER: &str = "\n…(truncated)";

pub struct ShellExecutor {
    config: ShellConfig,
}

impl ShellExecutor {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    /// Checks the enable flag and both allow-lists for `program` run by `username`.
    pub fn check_permitted(&self, program: &str, username: &str) -> Result<(), IdeabotError> {
        if !self.config.enabled {
            return Err(IdeabotError::Execution {
                message: "shell execution is disabled".into(),
            });
        }
        if !self.config.allowed_users.is_empty() {
            let listed = self.config.allowed_users.iter().any(|allowed| {
                let allowed = allowed.strip_prefix('@').unwrap_or(allowed);
                allowed.eq_ignore_ascii_case(username)
            });
            if !listed {
                return Err(IdeabotError::Execution {
                    message: format!("user '{username}' is not permitted to run commands"),
                });
            }
        }
        if !self.config.allowed_commands.is_empty()
            && !self.config.allowed_commands.iter().any(|c| c == program)
        {
            return Err(IdeabotError::Execution {
                message: format!("command '{program}' is not permitted"),
            });
        }
        Ok(())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(
        &self,
        command_line: &str,
        username: &str,
    ) -> Result<CommandOutput, IdeabotError> {
        let mut tokens = command_line.split_whitespace();
        let Some(program) = tokens.next() else {
            return Err(IdeabotError::Execution {
                message: "empty command".into(),
            });
        };
        let args: Vec<&str> = tokens.collect();

        if let Err(e) = self.check_permitted(program, username) {
            warn!(program, username, "shell command rejected");
            return Err(e);
        }

        debug!(program, ?args, username, "running shell command");
        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| IdeabotError::Execution {
                message: format!("failed to start '{program}': {e}"),
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout(), child.wait_with_output())
            .await
            .map_err(|_| IdeabotError::Timeout {
                duration: self.timeout(),
            })?
            .map_err(|e| IdeabotError::Execution {
                message: format!("failed to collect output of '{program}': {e}"),
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            output: truncate_output(combined, self.config.max_output_bytes),
            success: output.status.success(),
            exit_code: output.status.code(),
        })
    }
}

/// Cuts `output` to at most `max_bytes` on a char boundary, appending a marker.
pub fn truncate_output(mut output: String, max_bytes: usize) -> String {
    if output.len() <= max_bytes {
        return output;
    }
    let mut cut = max_bytes;
    while !output.is_char_boundary(cut) {
        cut -= 1;
    }
    output.truncate(cut);
    output.push_str(TRUNCATION_MARKER);
    output
}
