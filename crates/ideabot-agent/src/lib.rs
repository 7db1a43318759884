// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ideabot event loop.
//!
//! [`AgentLoop`] pulls one event at a time from the channel, appends it to
//! the audit log, asks the router what to do, carries that out, and sends at
//! most one reply. Events are processed strictly in order.

pub mod replies;
pub mod shell;
pub mod shutdown;
pub mod tracking;

use std::sync::Arc;

use ideabot_core::{
    AutoReply, ChannelAdapter, ChatEvent, CommandExecutor, IdeabotError, MessageRecord,
    OutboundReply, ProviderAdapter, StorageAdapter, TaskType,
};
use ideabot_router::{MessageRouter, Route, classify, fallback_reply};
use ideabot_storage::{RoutingStore, TaskQueue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::tracking::TaskTracker;

pub use shell::ShellExecutor;

pub struct AgentLoop {
    channel: Box<dyn ChannelAdapter + Send + Sync>,
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    executor: Arc<dyn CommandExecutor>,
    routing: RoutingStore,
    tracker: TaskTracker,
    autoreplies: Vec<AutoReply>,
    router: MessageRouter,
}

impl AgentLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        channel: Box<dyn ChannelAdapter + Send + Sync>,
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        executor: Arc<dyn CommandExecutor>,
        routing: RoutingStore,
        tasks: Arc<TaskQueue>,
        autoreplies: Vec<AutoReply>,
        router: MessageRouter,
    ) -> Self {
        info!(
            channel = channel.name(),
            provider = provider.name(),
            autoreplies = autoreplies.len(),
            "agent loop initialized"
        );
        Self {
            channel,
            provider,
            storage,
            executor,
            routing,
            tracker: TaskTracker::new(tasks),
            autoreplies,
            router,
        }
    }

    /// Runs until `cancel` fires or the channel closes.
    ///
    /// An event already received is always processed to completion; the
    /// token is only observed between events. On exit the channel
    /// subscription is released and the audit store is closed.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), IdeabotError> {
        info!("agent loop running");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
                event = self.channel.receive() => {
                    match event {
                        Ok(event) => {
                            self.handle_event(event).await;
                        }
                        Err(IdeabotError::ChannelClosed(name)) => {
                            info!(channel = %name, "channel closed, stopping agent loop");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                        }
                    }
                }
            }
        }

        if let Err(e) = self.channel.shutdown().await {
            warn!(error = %e, "channel shutdown failed");
        }
        self.storage.close().await?;

        info!("agent loop stopped");
        Ok(())
    }

    /// Processes one event and returns the reply that was sent, if any.
    pub async fn handle_event(&self, event: ChatEvent) -> Option<String> {
        let category = classify(&event.text);

        if let Err(e) = self
            .storage
            .record_message(&MessageRecord::from_event(&event, category))
            .await
        {
            error!(chat_id = event.chat_id, error = %e, "failed to record message");
        }

        info!(
            chat_id = event.chat_id,
            user = %event.username,
            "[{}] {}",
            category.to_string().to_uppercase(),
            event.text
        );
        if event.is_command {
            info!(
                "[COMMAND] /{} {}",
                event.command_name.as_deref().unwrap_or_default(),
                event.command_args.as_deref().unwrap_or_default()
            );
        }

        let routing = self.routing.snapshot().await;
        let route = self
            .router
            .route(&event, category, &routing, &self.autoreplies);
        debug!(chat_id = event.chat_id, ?route, "route selected");

        let text = self.execute(&event, route).await?;
        let reply = OutboundReply {
            chat_id: event.chat_id,
            text: text.clone(),
        };
        if let Err(e) = self.channel.send(reply).await {
            warn!(chat_id = event.chat_id, error = %e, "failed to send reply");
        }
        Some(text)
    }

    async fn execute(&self, event: &ChatEvent, route: Route) -> Option<String> {
        match route {
            Route::SetModel { model } => {
                let persisted = self.routing.set_ai_model(&model).await;
                match &persisted {
                    Ok(()) => info!(%model, "default AI model changed"),
                    Err(e) => warn!(%model, error = %e, "AI model changed but not persisted"),
                }
                Some(replies::model_set(&model, persisted.as_ref().err()))
            }
            Route::AskAi { prompt, model } => {
                let task = self
                    .tracker
                    .start(TaskType::Ai, &event.username, event.chat_id, &model)
                    .await;
                let result = self.generate(&prompt, &model).await;
                let text = match &result {
                    Ok(reply) => reply.clone(),
                    Err(e) => {
                        warn!(%model, error = %e, "explicit AI request failed");
                        replies::ai_error(e)
                    }
                };
                self.tracker.finish(task, result.is_ok(), &model).await;
                Some(text)
            }
            Route::RunShell { command_line } => {
                let task = self
                    .tracker
                    .start(
                        TaskType::Command,
                        &event.username,
                        event.chat_id,
                        &command_line,
                    )
                    .await;
                let result = self.executor.execute(&command_line, &event.username).await;
                let success = matches!(&result, Ok(out) if out.success);
                if let Err(e) = &result {
                    warn!(command = %command_line, error = %e, "shell command failed");
                }
                self.tracker.finish(task, success, &command_line).await;
                Some(replies::shell_result(&result))
            }
            Route::Status => Some(replies::STATUS_REPLY.to_string()),
            Route::Acknowledge { command } => Some(replies::acknowledge(&command)),
            Route::Reply {
                prompt,
                model,
                category,
            } => match self.generate(&prompt, &model).await {
                Ok(reply) => Some(reply),
                Err(e) => {
                    debug!(%model, error = %e, "AI unavailable, using canned reply");
                    Some(fallback_reply(&category.to_string()).to_string())
                }
            },
            Route::Ignore => None,
        }
    }

    /// Calls the provider, treating a blank answer as a failure.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, IdeabotError> {
        let reply = self.provider.generate(prompt, model).await?;
        if reply.trim().is_empty() {
            return Err(IdeabotError::Provider {
                message: "empty response from model".into(),
                body: None,
                source: None,
            });
        }
        Ok(reply)
    }
}
