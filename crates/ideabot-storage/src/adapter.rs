// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use ideabot_core::{
    AdapterType, HealthStatus, IdeabotError, MessageRecord, PluginAdapter, StorageAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed audit log.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// operation fails until then.
pub struct SqliteStorage {
    path: PathBuf,
    wal_mode: bool,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(path: impl Into<PathBuf>, wal_mode: bool) -> Self {
        Self {
            path: path.into(),
            wal_mode,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, IdeabotError> {
        self.db.get().ok_or_else(|| IdeabotError::Storage {
            source: "storage not initialized, call initialize() first".into(),
        })
    }

    /// Total number of audit records.
    pub async fn message_count(&self) -> Result<i64, IdeabotError> {
        queries::messages::count_messages(self.db()?).await
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), IdeabotError> {
        if !self.wal_mode {
            return Ok(());
        }
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE);", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, IdeabotError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get(0))
            })
            .await;
        Ok(match probe {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), IdeabotError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), IdeabotError> {
        let db = Database::open(&self.path, self.wal_mode).await?;
        self.db.set(db).map_err(|_| IdeabotError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.path.display(), "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), IdeabotError> {
        let db = self.db()?;
        self.checkpoint(db).await
    }

    async fn record_message(&self, record: &MessageRecord) -> Result<(), IdeabotError> {
        queries::messages::insert_message(self.db()?, record).await?;
        Ok(())
    }

    async fn recent_messages(&self, limit: i64) -> Result<Vec<MessageRecord>, IdeabotError> {
        queries::messages::recent_messages(self.db()?, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ideabot_core::Category;

    fn record(chat_id: i64, text: &str, category: Category) -> MessageRecord {
        MessageRecord {
            chat_id,
            user_id: 7,
            username: "alice".into(),
            text: text.into(),
            is_bot: false,
            category,
            timestamp: Utc::now(),
        }
    }

    async fn open() -> (SqliteStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("data.db"), true);
        storage.initialize().await.unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let storage = SqliteStorage::new("/nonexistent/never.db", true);
        let err = storage
            .record_message(&record(1, "hi", Category::Message))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not initialized"));
        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn double_initialize_is_rejected() {
        let (storage, _dir) = open().await;
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn records_come_back_in_insertion_order() {
        let (storage, _dir) = open().await;
        for (i, text) in ["first", "second", "third"].iter().enumerate() {
            storage
                .record_message(&record(i as i64, text, Category::Message))
                .await
                .unwrap();
        }

        let all = storage.recent_messages(10).await.unwrap();
        let texts: Vec<_> = all.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);

        let last_two = storage.recent_messages(2).await.unwrap();
        assert_eq!(last_two[0].text, "second");
        assert_eq!(last_two[1].text, "third");
    }

    #[tokio::test]
    async fn category_and_flags_round_trip() {
        let (storage, _dir) = open().await;
        let mut rec = record(-100, "bug report", Category::Issue);
        rec.is_bot = true;
        storage.record_message(&rec).await.unwrap();

        let back = storage.recent_messages(1).await.unwrap().remove(0);
        assert_eq!(back.category, Category::Issue);
        assert!(back.is_bot);
        assert_eq!(back.chat_id, -100);
        assert_eq!(storage.message_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn reopening_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.db");
        {
            let storage = SqliteStorage::new(&path, true);
            storage.initialize().await.unwrap();
            storage
                .record_message(&record(1, "persisted", Category::Message))
                .await
                .unwrap();
            storage.close().await.unwrap();
        }
        let storage = SqliteStorage::new(&path, true);
        storage.initialize().await.unwrap();
        assert_eq!(storage.recent_messages(5).await.unwrap()[0].text, "persisted");
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
