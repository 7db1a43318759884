// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ideabot ai` subcommands.

use ideabot_config::IdeabotConfig;
use ideabot_core::IdeabotError;
use ideabot_ollama::OllamaProvider;
use ideabot_router::MessageRouter;
use ideabot_storage::RoutingStore;

use crate::AiCommands;

pub async fn run_ai(config: &IdeabotConfig, action: AiCommands) -> Result<(), IdeabotError> {
    match action {
        AiCommands::Show => {
            let store = RoutingStore::load_or_create(config.routing_path()).await?;
            let routing = store.snapshot().await;
            let router = MessageRouter::from_config(&config.agent);
            println!("model:   {}", router.model_for(&routing));
            println!("backend: {}", config.ollama.base_url);
            let prompt = routing.effective_prompt(&config.agent.default_prompt);
            println!("prompt:  {prompt}");
        }
        AiCommands::Models => {
            let provider = OllamaProvider::new(&config.ollama)?;
            let models = provider.list_models().await?;
            if models.is_empty() {
                println!("no models installed at {}", config.ollama.base_url);
            }
            for model in models {
                println!("{model}");
            }
        }
        AiCommands::SetModel { name } => {
            let store = RoutingStore::load_or_create(config.routing_path()).await?;
            set_model(&store, &name).await?;
            println!("AI model set to {}", name.trim());
        }
    }
    Ok(())
}

async fn set_model(store: &RoutingStore, name: &str) -> Result<(), IdeabotError> {
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(IdeabotError::Config(format!("invalid model name '{name}'")));
    }
    store.set_ai_model(name).await
}
