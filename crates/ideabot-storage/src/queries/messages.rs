// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit log inserts and reads.

use chrono::{DateTime, SecondsFormat, Utc};
use ideabot_core::{Category, IdeabotError, MessageRecord};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{Database, map_tr_err};

/// Appends one record. Returns the new row id.
pub async fn insert_message(db: &Database, record: &MessageRecord) -> Result<i64, IdeabotError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO messages (chat_id, user_id, username, text, is_bot, category, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.chat_id,
                    record.user_id,
                    record.username,
                    record.text,
                    record.is_bot,
                    record.category.to_string(),
                    record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Returns the last `limit` records in insertion order.
pub async fn recent_messages(db: &Database, limit: i64) -> Result<Vec<MessageRecord>, IdeabotError> {
    db.connection()
        .call(move |conn| -> Result<Vec<MessageRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT chat_id, user_id, username, text, is_bot, category, created_at
                 FROM (SELECT * FROM messages ORDER BY id DESC LIMIT ?1)
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                let category: String = row.get(5)?;
                let created_at: String = row.get(6)?;
                Ok(MessageRecord {
                    chat_id: row.get(0)?,
                    user_id: row.get(1)?,
                    username: row.get(2)?,
                    text: row.get(3)?,
                    is_bot: row.get(4)?,
                    category: category
                        .parse::<Category>()
                        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
                    timestamp: DateTime::parse_from_rfc3339(&created_at)
                        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?
                        .with_timezone(&Utc),
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Number of audit rows, used by health reporting and tests.
pub async fn count_messages(db: &Database) -> Result<i64, IdeabotError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)
}
