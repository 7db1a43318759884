// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock command executor that records invocations.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use ideabot_core::{CommandExecutor, CommandOutput, IdeabotError};
use tokio::sync::Mutex;

/// Without scripted outputs every command succeeds and echoes its line.
#[derive(Default)]
pub struct MockExecutor {
    script: Arc<Mutex<VecDeque<Result<CommandOutput, String>>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_output(&self, output: CommandOutput) {
        self.script.lock().await.push_back(Ok(output));
    }

    /// Queues an execution error with `message`.
    pub async fn push_error(&self, message: &str) {
        self.script.lock().await.push_back(Err(message.to_string()));
    }

    /// `(command_line, username)` for every call.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn execute(
        &self,
        command_line: &str,
        username: &str,
    ) -> Result<CommandOutput, IdeabotError> {
        self.calls
            .lock()
            .await
            .push((command_line.to_string(), username.to_string()));
        match self.script.lock().await.pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(IdeabotError::Execution { message }),
            None => Ok(CommandOutput {
                output: command_line.to_string(),
                success: true,
                exit_code: Some(0),
            }),
        }
    }
}
