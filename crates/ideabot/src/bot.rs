// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ideabot bot` subcommands: the registry of Telegram bot tokens.

use ideabot_config::IdeabotConfig;
use ideabot_core::{BotConfig, IdeabotError, RoutingConfig};
use ideabot_storage::RoutingStore;

use crate::BotCommands;

pub async fn run_bot(config: &IdeabotConfig, action: BotCommands) -> Result<(), IdeabotError> {
    let store = RoutingStore::load_or_create(config.routing_path()).await?;
    match action {
        BotCommands::Add { id, token, default } => {
            add_bot(&store, &id, &token, default).await?;
            println!("bot '{id}' registered{}", if default { " as default" } else { "" });
        }
        BotCommands::List => {
            let listing = format_bots(&store.snapshot().await);
            if listing.is_empty() {
                println!("no bots registered");
            } else {
                print!("{listing}");
            }
        }
    }
    Ok(())
}

async fn add_bot(
    store: &RoutingStore,
    id: &str,
    token: &str,
    make_default: bool,
) -> Result<(), IdeabotError> {
    let id = id.trim();
    let token = token.trim();
    if id.is_empty() {
        return Err(IdeabotError::Config("bot id cannot be empty".into()));
    }
    if token.is_empty() {
        return Err(IdeabotError::Config("bot token cannot be empty".into()));
    }
    store
        .add_bot(
            BotConfig {
                id: id.to_string(),
                token: token.to_string(),
            },
            make_default,
        )
        .await
}

/// One line per bot, default marked with `*`, tokens masked.
fn format_bots(routing: &RoutingConfig) -> String {
    routing
        .bots
        .values()
        .map(|bot| {
            let marker = if bot.id == routing.default_bot_id { '*' } else { ' ' };
            format!("{marker} {}\t{}\n", bot.id, mask_token(&bot.token))
        })
        .collect()
}

/// Keeps the numeric bot id part of a `<id>:<secret>` token visible.
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{bot_id}:****"),
        None if token.is_empty() => "(empty)".to_string(),
        None => "****".to_string(),
    }
}
