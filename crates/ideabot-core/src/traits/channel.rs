// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait: the chat event source and reply sink.

use async_trait::async_trait;

use crate::error::IdeabotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatEvent, OutboundReply};

/// Adapter for a messaging platform.
///
/// `receive` yields one event at a time from the platform subscription.
/// [`PluginAdapter::shutdown`] releases the subscription.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes the subscription to the messaging platform.
    async fn connect(&mut self) -> Result<(), IdeabotError>;

    /// Delivers a reply to a chat.
    async fn send(&self, reply: OutboundReply) -> Result<(), IdeabotError>;

    /// Receives the next inbound event.
    /// Returns [`IdeabotError::ChannelClosed`] once the stream has ended.
    async fn receive(&self) -> Result<ChatEvent, IdeabotError>;
}
