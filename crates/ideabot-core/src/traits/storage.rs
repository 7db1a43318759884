// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the append-only audit log.

use async_trait::async_trait;

use crate::error::IdeabotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::MessageRecord;

/// Insert-only sink for message audit records.
///
/// Implementations must preserve insertion order: records are read back in
/// the order they were recorded.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), IdeabotError>;

    /// Flushes pending writes and releases connections.
    async fn close(&self) -> Result<(), IdeabotError>;

    /// Appends one audit record.
    async fn record_message(&self, record: &MessageRecord) -> Result<(), IdeabotError>;

    /// Returns up to `limit` most recent records, oldest first.
    async fn recent_messages(&self, limit: i64) -> Result<Vec<MessageRecord>, IdeabotError>;
}
