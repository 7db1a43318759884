// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent access to the shared file-backed stores.

use std::collections::HashSet;
use std::sync::Arc;

use ideabot_core::{ProcessTask, TaskStatus, TaskType};
use ideabot_storage::{RoutingStore, TaskQueue};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let queue = Arc::new(TaskQueue::new(dir.path().join("process.json")));

    const N: usize = 40;
    let handles: Vec<_> = (0..N)
        .map(|i| {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                let task = ProcessTask::queued(TaskType::Command, "worker", i as i64, "job");
                queue.add(task).await.unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let tasks = queue.load().await.unwrap();
    assert_eq!(tasks.len(), N);
    let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), N);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_updates_and_removes_stay_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let queue = Arc::new(TaskQueue::new(dir.path().join("process.json")));

    let mut ids = Vec::new();
    for i in 0..20 {
        let task = ProcessTask::queued(TaskType::Ai, "u", i, "");
        ids.push(task.id.clone());
        queue.add(task).await.unwrap();
    }

    let handles: Vec<_> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let queue = Arc::clone(&queue);
            let id = id.clone();
            tokio::spawn(async move {
                if i % 2 == 0 {
                    queue.remove(&id).await.unwrap();
                } else {
                    queue.update_status(&id, TaskStatus::Done, None).await.unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let tasks = queue.load().await.unwrap();
    assert_eq!(tasks.len(), 10);
    assert!(tasks.iter().all(|t| t.status == TaskStatus::Done));
    assert!(queue.active().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_model_changes_end_with_a_persisted_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configs.json");
    let store = RoutingStore::load_or_create(&path).await.unwrap();

    let models = ["llama3", "mistral", "phi3", "gemma", "qwen"];
    let handles: Vec<_> = models
        .iter()
        .map(|m| {
            let store = store.clone();
            let model = m.to_string();
            tokio::spawn(async move { store.set_ai_model(&model).await.unwrap() })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let in_memory = store.snapshot().await.default_ai_model;
    let on_disk = RoutingStore::load_or_create(&path)
        .await
        .unwrap()
        .snapshot()
        .await
        .default_ai_model;
    assert!(models.contains(&in_memory.as_str()));
    assert_eq!(in_memory, on_disk);
}
