// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records long-running actions in the durable task queue.
//!
//! Each action goes `queued` → `running` → `done`/`error` and is removed once
//! resolved. Queue failures are logged and never block the action itself.

use std::sync::Arc;

use ideabot_core::{ProcessTask, TaskStatus, TaskType};
use ideabot_storage::TaskQueue;
use tracing::warn;

/// Handle for a task that has been started.
#[derive(Debug)]
pub struct TrackedTask {
    id: String,
}

impl TrackedTask {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Clone)]
pub struct TaskTracker {
    queue: Arc<TaskQueue>,
}

impl TaskTracker {
    pub fn new(queue: Arc<TaskQueue>) -> Self {
        Self { queue }
    }

    /// Enqueues a task and marks it running.
    pub async fn start(
        &self,
        task_type: TaskType,
        user: &str,
        chat_id: i64,
        info: &str,
    ) -> Option<TrackedTask> {
        let task = ProcessTask::queued(task_type, user, chat_id, info);
        let id = task.id.clone();
        if let Err(e) = self.queue.add(task).await {
            warn!(task_id = %id, error = %e, "failed to enqueue task");
            return None;
        }
        if let Err(e) = self.queue.update_status(&id, TaskStatus::Running, None).await {
            warn!(task_id = %id, error = %e, "failed to mark task running");
        }
        Some(TrackedTask { id })
    }

    /// Records the outcome, then removes the task.
    pub async fn finish(&self, task: Option<TrackedTask>, success: bool, info: &str) {
        let Some(task) = task else {
            return;
        };
        let status = if success {
            TaskStatus::Done
        } else {
            TaskStatus::Error
        };
        if let Err(e) = self.queue.update_status(&task.id, status, Some(info)).await {
            warn!(task_id = %task.id, error = %e, "failed to record task outcome");
        }
        if let Err(e) = self.queue.remove(&task.id).await {
            warn!(task_id = %task.id, error = %e, "failed to remove finished task");
        }
    }
}
