// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ideabot - a Telegram group assistant backed by a local Ollama model.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod ai;
mod bot;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ideabot_config::IdeabotConfig;

/// Ideabot - a Telegram group assistant backed by a local Ollama model.
#[derive(Parser, Debug)]
#[command(name = "ideabot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot (default).
    Serve,
    /// Manage registered Telegram bots.
    Bot {
        #[command(subcommand)]
        action: BotCommands,
    },
    /// Inspect and change the AI backend settings.
    Ai {
        #[command(subcommand)]
        action: AiCommands,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum BotCommands {
    /// Register a bot token.
    Add {
        /// Identifier used to refer to this bot.
        #[arg(long)]
        id: String,
        /// Telegram Bot API token.
        #[arg(long)]
        token: String,
        /// Make this the bot that `serve` connects with.
        #[arg(long)]
        default: bool,
    },
    /// List registered bots.
    List,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AiCommands {
    /// Print the model and prompt currently in effect.
    Show,
    /// List the models installed in the Ollama backend.
    Models,
    /// Persist a new default model.
    SetModel {
        /// Model name, e.g. `llama3` or `mistral:7b`.
        name: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            ideabot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Bot { action } => bot::run_bot(&config, action).await,
        Commands::Ai { action } => ai::run_ai(&config, action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<IdeabotConfig, Vec<ideabot_config::ConfigError>> {
    match path {
        Some(path) => ideabot_config::load_and_validate_path(path),
        None => ideabot_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` takes precedence over `log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ideabot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["ideabot"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn parses_bot_add() {
        let cli = Cli::try_parse_from([
            "ideabot", "bot", "add", "--id", "main", "--token", "123:abc", "--default",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Bot {
                action: BotCommands::Add { id, token, default },
            }) => {
                assert_eq!(id, "main");
                assert_eq!(token, "123:abc");
                assert!(default);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ideabot", "ai", "set-model", "mistral", "--config", "x.toml"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Ai {
                action: AiCommands::SetModel { ref name }
            }) if name == "mistral"
        ));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ideabot.toml");
        std::fs::write(&path, "[agent]\nname = \"helper\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.agent.name, "helper");
    }
}
