// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-document JSON files with crash-safe replacement.
//!
//! Saves go to `<file>.tmp`, are fsynced, then renamed over the target, so a
//! reader sees either the old or the new document and never a partial one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ideabot_core::IdeabotError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

/// Outcome of reading a JSON document.
#[derive(Debug)]
pub enum Loaded<T> {
    /// The file does not exist.
    Missing,
    /// The file exists but does not decode as `T`.
    Corrupt(serde_json::Error),
    Value(T),
}

/// Reads and decodes `path`. I/O failures other than "not found" are errors.
pub async fn load<T: DeserializeOwned>(path: &Path) -> Result<Loaded<T>, IdeabotError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Loaded::Missing),
        Err(e) => return Err(IdeabotError::storage(e)),
    };
    Ok(match serde_json::from_slice(&bytes) {
        Ok(value) => Loaded::Value(value),
        Err(e) => Loaded::Corrupt(e),
    })
}

/// Serializes `value` as indented JSON and atomically replaces `path`.
pub async fn save<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IdeabotError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(IdeabotError::storage)?;
    }

    let mut bytes = serde_json::to_vec_pretty(value).map_err(IdeabotError::storage)?;
    bytes.push(b'\n');

    let tmp = tmp_path(path);
    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(IdeabotError::storage)?;
    file.write_all(&bytes).await.map_err(IdeabotError::storage)?;
    file.sync_all().await.map_err(IdeabotError::storage)?;
    drop(file);

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(IdeabotError::storage)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Loaded<Vec<u32>> = load(&dir.path().join("none.json")).await.unwrap();
        assert!(matches!(loaded, Loaded::Missing));
    }

    #[tokio::test]
    async fn garbage_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let loaded: Loaded<Vec<u32>> = load(&path).await.unwrap();
        assert!(matches!(loaded, Loaded::Corrupt(_)));
    }

    #[tokio::test]
    async fn save_creates_parent_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        save(&path, &vec![1, 2, 3]).await.unwrap();

        assert!(!tmp_path(&path).exists());
        match load::<Vec<u32>>(&path).await.unwrap() {
            Loaded::Value(v) => assert_eq!(v, vec![1, 2, 3]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/data/process.json")),
            PathBuf::from("/data/process.json.tmp")
        );
    }
}
