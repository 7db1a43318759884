// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection management for the audit database.
//!
//! Schema preparation runs on a short-lived blocking connection; afterwards
//! every statement goes through the one tokio-rusqlite background thread.

use std::path::{Path, PathBuf};

use ideabot_core::IdeabotError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Handle to the audit database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: PathBuf,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and applies migrations.
    pub async fn open(path: &Path, wal_mode: bool) -> Result<Self, IdeabotError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(IdeabotError::storage)?;
        }

        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || prepare(&owned, wal_mode))
            .await
            .map_err(|e| IdeabotError::Internal(format!("schema preparation panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(IdeabotError::storage)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path.display(), wal_mode, "audit database opened");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn prepare(path: &Path, wal_mode: bool) -> Result<(), IdeabotError> {
    let mut conn = rusqlite::Connection::open(path).map_err(IdeabotError::storage)?;
    if wal_mode {
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(IdeabotError::storage)?;
        debug!(%mode, "journal mode set");
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(IdeabotError::storage)?;
    }
    run_migrations(&mut conn)
}

/// Converts a tokio-rusqlite error into the workspace error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> IdeabotError {
    IdeabotError::storage(e)
}
