// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for ideabot.
//!
//! This crate provides the adapter traits, the workspace error type, and the
//! domain types that flow between the event loop, the router, and storage.

pub mod error;
pub mod traits;
pub mod types;

pub use error::IdeabotError;
pub use types::{
    AdapterType, AutoReply, BotConfig, Category, ChatEvent, CommandOutput, HealthStatus,
    MessageRecord, OutboundReply, ProcessTask, RoutingConfig, TaskStatus, TaskType,
};

pub use traits::{
    ChannelAdapter, CommandExecutor, PluginAdapter, ProviderAdapter, StorageAdapter,
};
