// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for ideabot.

use thiserror::Error;

/// The primary error type used across all ideabot adapters and core operations.
#[derive(Debug, Error)]
pub enum IdeabotError {
    /// Configuration errors (invalid TOML, missing bot, empty token).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage errors (database, JSON stores, file I/O).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel errors (polling failure, send failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generative backend errors. `body` carries the raw response body when
    /// the backend answered with something that could not be decoded.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        body: Option<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Shell execution errors (empty command line, spawn failure, denied command).
    #[error("execution error: {message}")]
    Execution { message: String },

    /// The channel's event stream has ended; no further events will arrive.
    #[error("channel closed: {0}")]
    ChannelClosed(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IdeabotError {
    /// Wraps any error as a storage error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        IdeabotError::Storage {
            source: Box::new(err),
        }
    }
}
