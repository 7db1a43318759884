// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ideabot serve` command implementation.
//!
//! Opens the stores in the data directory, resolves the bot token, connects
//! the Telegram channel and the Ollama provider, and runs the agent loop
//! until SIGINT/SIGTERM.

use std::sync::Arc;

use ideabot_agent::{AgentLoop, ShellExecutor, shutdown};
use ideabot_config::IdeabotConfig;
use ideabot_core::{ChannelAdapter, IdeabotError, PluginAdapter, RoutingConfig, StorageAdapter};
use ideabot_ollama::OllamaProvider;
use ideabot_router::MessageRouter;
use ideabot_storage::{AutoReplyStore, RoutingStore, SqliteStorage, TaskQueue};
use ideabot_telegram::TelegramChannel;
use tracing::{info, warn};

/// Runs the `ideabot serve` command.
pub async fn run_serve(config: IdeabotConfig) -> Result<(), IdeabotError> {
    info!(name = %config.agent.name, data_dir = %config.agent.data_dir, "starting ideabot serve");

    tokio::fs::create_dir_all(config.data_dir())
        .await
        .map_err(IdeabotError::storage)?;

    let routing = RoutingStore::load_or_create(config.routing_path()).await?;
    let token = resolve_token(&config, &routing.snapshot().await)?;

    let autoreplies = AutoReplyStore::new(config.autoreply_path())
        .ensure_loaded()
        .await?;

    let tasks = Arc::new(TaskQueue::new(config.tasks_path()));
    report_stale_tasks(&tasks).await;

    if config.shell.is_unrestricted() {
        warn!("shell execution is unrestricted; any chat member can run any program via /run");
    }

    let storage = SqliteStorage::new(config.database_path(), config.storage.wal_mode);
    storage.initialize().await?;
    let storage = Arc::new(storage);

    let provider =
        OllamaProvider::new(&config.ollama)?.with_default_model(&config.agent.default_model);
    match provider.health_check().await {
        Ok(status) => info!(?status, "ollama backend checked"),
        Err(e) => warn!(error = %e, "ollama backend health check failed"),
    }

    let mut channel = TelegramChannel::new(&token, config.telegram.clone())?;
    channel.connect().await?;

    let executor = Arc::new(ShellExecutor::new(config.shell.clone()));
    let router = MessageRouter::from_config(&config.agent);

    let cancel = shutdown::install_signal_handler();

    let mut agent_loop = AgentLoop::new(
        Box::new(channel),
        Arc::new(provider),
        storage,
        executor,
        routing,
        tasks,
        autoreplies,
        router,
    );
    agent_loop.run(cancel).await?;

    info!("ideabot serve shutdown complete");
    Ok(())
}

/// Picks the bot token: the process config override first, then the default
/// bot of the routing configuration.
pub fn resolve_token(config: &IdeabotConfig, routing: &RoutingConfig) -> Result<String, IdeabotError> {
    if let Some(token) = config.telegram.bot_token.as_deref()
        && !token.trim().is_empty()
    {
        return Ok(token.trim().to_string());
    }

    if routing.default_bot_id.trim().is_empty() {
        return Err(IdeabotError::Config(
            "no default bot configured; run `ideabot bot add --id <id> --token <token> --default` \
             or set telegram.bot_token"
                .into(),
        ));
    }

    let bot = routing.default_bot().ok_or_else(|| {
        IdeabotError::Config(format!(
            "default bot '{}' is not registered; run `ideabot bot list` to see registered bots",
            routing.default_bot_id
        ))
    })?;

    if bot.token.trim().is_empty() {
        return Err(IdeabotError::Config(format!(
            "bot '{}' has an empty token",
            bot.id
        )));
    }
    Ok(bot.token.trim().to_string())
}

/// Tasks left active by a previous process are reported and kept for inspection.
async fn report_stale_tasks(tasks: &TaskQueue) {
    match tasks.active().await {
        Ok(active) if !active.is_empty() => {
            for task in &active {
                warn!(
                    task_id = %task.id,
                    task_type = %task.task_type,
                    status = %task.status,
                    user = %task.user,
                    "task left active by a previous run"
                );
            }
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "failed to read task queue"),
    }
}
