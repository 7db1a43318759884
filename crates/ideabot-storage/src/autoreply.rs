// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persisted autoreply table (`auto.json`).
//!
//! The table decides which keyword families the bot volunteers replies for.
//! It is read once at startup and only ever rewritten as a whole.

use std::path::{Path, PathBuf};

use ideabot_core::{AutoReply, IdeabotError};
use tracing::{info, warn};

use crate::json_store::{self, Loaded};

/// The five-entry seed written when the table is missing or empty.
pub fn default_autoreplies() -> Vec<AutoReply> {
    let seed = [
        (
            "greeting",
            "👋 Hello! I'm here to help with software engineering tasks.",
            "when users greet the bot",
        ),
        (
            "issue",
            "🐛 I see you've mentioned an issue. Can you provide more details like steps to reproduce, expected vs actual behavior?",
            "when users report bugs or issues",
        ),
        (
            "feature",
            "💡 Interesting feature idea! Let's break it down. What's the main use case and expected outcome?",
            "when users suggest new features",
        ),
        (
            "question",
            "🤔 Good question! Let me help you with that. Can you provide more context?",
            "when users ask questions",
        ),
        (
            "code",
            "💻 I can help with code review, debugging, or implementation suggestions. Share your code!",
            "when users mention code-related topics",
        ),
    ];
    seed.iter()
        .zip(1..)
        .map(|(&(category, reply, context), id)| AutoReply {
            id,
            category: category.to_string(),
            reply: reply.to_string(),
            context: context.to_string(),
        })
        .collect()
}

/// File-backed autoreply table.
#[derive(Debug, Clone)]
pub struct AutoReplyStore {
    path: PathBuf,
}

impl AutoReplyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored table, seeding it first when it is missing, empty,
    /// or undecodable. A non-empty valid table is never rewritten.
    ///
    /// Only unreadable files (permissions and the like) produce an error. A
    /// failed seed write is logged and the seed is still returned.
    pub async fn ensure_loaded(&self) -> Result<Vec<AutoReply>, IdeabotError> {
        match json_store::load::<Vec<AutoReply>>(&self.path).await? {
            Loaded::Value(table) if !table.is_empty() => return Ok(table),
            Loaded::Value(_) => warn!(path = %self.path.display(), "autoreply table is empty, regenerating"),
            Loaded::Corrupt(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "autoreply table is corrupt, regenerating"
            ),
            Loaded::Missing => {}
        }

        let seed = default_autoreplies();
        if let Err(e) = self.write(&seed).await {
            warn!(path = %self.path.display(), error = %e, "failed to write autoreply seed");
        }
        Ok(seed)
    }

    /// Overwrites the table with the default seed.
    pub async fn regenerate(&self) -> Result<Vec<AutoReply>, IdeabotError> {
        let seed = default_autoreplies();
        self.write(&seed).await?;
        Ok(seed)
    }

    async fn write(&self, table: &[AutoReply]) -> Result<(), IdeabotError> {
        json_store::save(&self.path, table).await?;
        info!(path = %self.path.display(), entries = table.len(), "wrote autoreply table");
        Ok(())
    }
}
