// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command executor trait for chat-triggered shell commands.

use async_trait::async_trait;

use crate::error::IdeabotError;
use crate::types::CommandOutput;

/// Runs a whitespace-tokenized command line without shell interpretation.
///
/// The first token is the program, the remaining tokens are its arguments.
/// A non-zero exit is reported through [`CommandOutput::success`], not as an error.
#[async_trait]
pub trait CommandExecutor: Send + Sync + 'static {
    /// Executes `command_line` on behalf of `username`.
    async fn execute(
        &self,
        command_line: &str,
        username: &str,
    ) -> Result<CommandOutput, IdeabotError>;
}
