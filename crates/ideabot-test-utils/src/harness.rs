// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end tests of the event pipeline.
//!
//! `TestHarness` assembles an [`AgentLoop`] with mock channel, provider, and
//! executor, plus real stores (SQLite audit log, routing config, autoreply
//! table, task queue) in a temporary data directory.

use std::sync::Arc;

use ideabot_agent::AgentLoop;
use ideabot_config::model::AgentConfig;
use ideabot_core::{AutoReply, ChatEvent, IdeabotError, RoutingConfig, StorageAdapter};
use ideabot_router::MessageRouter;
use ideabot_storage::{AutoReplyStore, RoutingStore, SqliteStorage, TaskQueue, json_store};

use crate::mock_channel::MockChannel;
use crate::mock_executor::MockExecutor;
use crate::mock_provider::MockProvider;

pub struct TestHarnessBuilder {
    provider: Option<MockProvider>,
    routing: Option<RoutingConfig>,
    autoreplies: Option<Vec<AutoReply>>,
    agent: AgentConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            provider: None,
            routing: None,
            autoreplies: None,
            agent: AgentConfig::default(),
        }
    }

    /// Scripted provider answers.
    pub fn with_responses(mut self, responses: Vec<String>) -> Self {
        self.provider = Some(MockProvider::with_responses(responses));
        self
    }

    /// A provider that always fails.
    pub fn with_failing_provider(mut self) -> Self {
        self.provider = Some(MockProvider::failing());
        self
    }

    /// Pre-existing `configs.json` content.
    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = Some(routing);
        self
    }

    /// Pre-existing `auto.json` content. Without this the default seed is used.
    pub fn with_autoreplies(mut self, table: Vec<AutoReply>) -> Self {
        self.autoreplies = Some(table);
        self
    }

    pub fn with_agent_config(mut self, agent: AgentConfig) -> Self {
        self.agent = agent;
        self
    }

    pub async fn build(self) -> Result<TestHarness, IdeabotError> {
        let temp_dir = tempfile::TempDir::new().map_err(IdeabotError::storage)?;
        let dir = temp_dir.path();

        let storage = Arc::new(SqliteStorage::new(dir.join("data.db"), true));
        storage.initialize().await?;

        let routing_path = dir.join("configs.json");
        if let Some(routing) = &self.routing {
            json_store::save(&routing_path, routing).await?;
        }
        let routing = RoutingStore::load_or_create(routing_path).await?;

        let autoreply_store = AutoReplyStore::new(dir.join("auto.json"));
        if let Some(table) = &self.autoreplies {
            json_store::save(autoreply_store.path(), table).await?;
        }
        let autoreplies = autoreply_store.ensure_loaded().await?;

        let tasks = Arc::new(TaskQueue::new(dir.join("process.json")));
        let mock_channel = MockChannel::new();
        let mock_provider = Arc::new(self.provider.unwrap_or_default());
        let mock_executor = Arc::new(MockExecutor::new());

        let agent = AgentLoop::new(
            Box::new(mock_channel.clone()),
            mock_provider.clone(),
            storage.clone(),
            mock_executor.clone(),
            routing.clone(),
            tasks.clone(),
            autoreplies,
            MessageRouter::from_config(&self.agent),
        );

        Ok(TestHarness {
            agent,
            mock_channel,
            mock_provider,
            mock_executor,
            storage,
            routing,
            tasks,
            temp_dir,
        })
    }
}

pub struct TestHarness {
    pub agent: AgentLoop,
    pub mock_channel: MockChannel,
    pub mock_provider: Arc<MockProvider>,
    pub mock_executor: Arc<MockExecutor>,
    pub storage: Arc<SqliteStorage>,
    pub routing: RoutingStore,
    pub tasks: Arc<TaskQueue>,
    temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn data_dir(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// Pushes `event` through the pipeline and returns the reply, if any.
    pub async fn send(&self, event: ChatEvent) -> Option<String> {
        self.agent.handle_event(event).await
    }

    /// Sends `text` as user 7 ("alice") in group chat -100.
    pub async fn send_group_text(&self, text: &str) -> Option<String> {
        self.send(group_event(text)).await
    }
}

/// A group-chat event with an explicit non-direct flag.
pub fn group_event(text: &str) -> ChatEvent {
    ChatEvent {
        is_direct: Some(false),
        ..ChatEvent::text(-100, 7, "alice", text)
    }
}
