// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable queue of long-running task records (`process.json`).
//!
//! Every operation is a full load-modify-save cycle performed while holding
//! one lock, so concurrent callers never lose each other's updates. Share a
//! single [`TaskQueue`] per file (wrap it in an `Arc`).

use std::path::{Path, PathBuf};

use ideabot_core::{IdeabotError, ProcessTask, TaskStatus};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::json_store::{self, Loaded};

/// On-disk shapes accepted when reading. Writes always use the bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTasks {
    List(Vec<ProcessTask>),
    Wrapped { tasks: Vec<ProcessTask> },
}

impl From<StoredTasks> for Vec<ProcessTask> {
    fn from(stored: StoredTasks) -> Self {
        match stored {
            StoredTasks::List(tasks) | StoredTasks::Wrapped { tasks } => tasks,
        }
    }
}

pub struct TaskQueue {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TaskQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tasks in stored order. Missing or corrupt files read as empty.
    pub async fn load(&self) -> Result<Vec<ProcessTask>, IdeabotError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Replaces the whole queue.
    pub async fn save(&self, tasks: &[ProcessTask]) -> Result<(), IdeabotError> {
        let _guard = self.lock.lock().await;
        json_store::save(&self.path, tasks).await
    }

    /// Appends `task`. The caller supplies a collision-resistant id.
    pub async fn add(&self, task: ProcessTask) -> Result<(), IdeabotError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.read().await?;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(IdeabotError::Internal(format!(
                "task id {} already exists",
                task.id
            )));
        }
        debug!(task_id = %task.id, task_type = %task.task_type, "task added");
        tasks.push(task);
        json_store::save(&self.path, &tasks).await
    }

    /// Drops the task with `id`. Unknown ids are a no-op.
    pub async fn remove(&self, id: &str) -> Result<(), IdeabotError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.read().await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(());
        }
        debug!(task_id = %id, "task removed");
        json_store::save(&self.path, &tasks).await
    }

    /// Updates status and info of the task with `id`.
    ///
    /// Returns `false` without writing when no such task exists.
    pub async fn update_status(
        &self,
        id: &str,
        status: TaskStatus,
        info: Option<&str>,
    ) -> Result<bool, IdeabotError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.read().await?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.status = status;
        if let Some(info) = info {
            task.info = info.to_string();
        }
        debug!(task_id = %id, %status, "task status updated");
        json_store::save(&self.path, &tasks).await?;
        Ok(true)
    }

    /// Tasks that are neither `done` nor `error`, in stored order.
    pub async fn active(&self) -> Result<Vec<ProcessTask>, IdeabotError> {
        let mut tasks = self.load().await?;
        tasks.retain(|t| t.status.is_active());
        Ok(tasks)
    }

    async fn read(&self) -> Result<Vec<ProcessTask>, IdeabotError> {
        match json_store::load::<StoredTasks>(&self.path).await? {
            Loaded::Value(stored) => Ok(stored.into()),
            Loaded::Missing => Ok(Vec::new()),
            Loaded::Corrupt(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "task queue is corrupt, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideabot_core::TaskType;
    use tracing_test::traced_test;

    fn queue() -> (TaskQueue, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (TaskQueue::new(dir.path().join("process.json")), dir)
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let (queue, _dir) = queue();
        assert!(queue.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn corrupt_file_loads_empty_and_warns() {
        let (queue, _dir) = queue();
        tokio::fs::write(queue.path(), "not json at all").await.unwrap();
        assert!(queue.load().await.unwrap().is_empty());
        assert!(logs_contain("task queue is corrupt"));
    }

    #[tokio::test]
    async fn wrapped_format_is_readable() {
        let (queue, _dir) = queue();
        let json = r#"{"tasks":[{"id":"1-2-3","type":"command","user":"bob","chat_id":5,
            "created_at":"2026-01-02T03:04:05Z","status":"running","info":"ls"}]}"#;
        tokio::fs::write(queue.path(), json).await.unwrap();

        let tasks = queue.load().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_type, TaskType::Command);
        assert_eq!(tasks[0].status, TaskStatus::Running);
    }

    #[tokio::test]
    async fn add_then_remove() {
        let (queue, _dir) = queue();
        let task = ProcessTask::queued(TaskType::Ai, "alice", 1, "prompt");
        queue.add(task.clone()).await.unwrap();

        let loaded = queue.load().await.unwrap();
        assert_eq!(loaded.iter().filter(|t| t.id == task.id).count(), 1);

        queue.remove(&task.id).await.unwrap();
        assert!(queue.load().await.unwrap().iter().all(|t| t.id != task.id));
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let (queue, _dir) = queue();
        let task = ProcessTask::queued(TaskType::Ai, "alice", 1, "");
        queue.add(task.clone()).await.unwrap();
        assert!(queue.add(task).await.is_err());
        assert_eq!(queue.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn removing_unknown_id_is_noop() {
        let (queue, _dir) = queue();
        queue.remove("nope").await.unwrap();
        assert!(!queue.path().exists());
    }

    #[tokio::test]
    async fn done_tasks_leave_active_set() {
        let (queue, _dir) = queue();
        let a = ProcessTask::queued(TaskType::Command, "bob", 2, "ls");
        let b = ProcessTask::queued(TaskType::Ai, "bob", 2, "hi");
        queue.add(a.clone()).await.unwrap();
        queue.add(b.clone()).await.unwrap();

        assert!(queue.update_status(&a.id, TaskStatus::Running, None).await.unwrap());
        assert!(
            queue
                .update_status(&a.id, TaskStatus::Done, Some("exit 0"))
                .await
                .unwrap()
        );
        assert!(!queue.update_status("missing", TaskStatus::Done, None).await.unwrap());

        let active = queue.active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);

        let all = queue.load().await.unwrap();
        assert_eq!(all[0].info, "exit 0");
    }
}
