// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The routing decision engine.
//!
//! [`MessageRouter::route`] evaluates the rules in strict precedence order:
//! set-model directive, AI trigger token, explicit command, implicit trigger.
//! The first rule that applies decides the [`Route`]; execution of the route
//! (AI calls, shell commands, persistence) belongs to the caller.

use ideabot_config::AgentConfig;
use ideabot_core::{AutoReply, Category, ChatEvent, RoutingConfig};
use tracing::debug;

use crate::directive::{contains_trigger, parse_set_model};
use crate::trigger::should_respond;

/// What the bot should do with one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Change the live default AI model and persist it.
    SetModel { model: String },
    /// Explicit AI invocation. Errors are shown to the user verbatim.
    AskAi { prompt: String, model: String },
    /// `/run <args>`: execute a tokenized command line.
    RunShell { command_line: String },
    /// `/status`.
    Status,
    /// Any other command, acknowledged by name.
    Acknowledge { command: String },
    /// Implicit reply: AI first, canned fallback for `category` on failure.
    Reply {
        prompt: String,
        model: String,
        category: Category,
    },
    /// Stay silent.
    Ignore,
}

/// Builds the prompt sent to the AI backend.
///
/// With a category the system part is annotated with the message type, as on
/// the implicit reply path.
pub fn build_prompt(system: &str, text: &str, category: Option<Category>) -> String {
    match category {
        Some(category) => format!("{system} Message type: {category}.\n\nUser message: {text}"),
        None => format!("{system}\n\nUser message: {text}"),
    }
}

/// Stateless router configured from the `[agent]` section.
#[derive(Debug, Clone)]
pub struct MessageRouter {
    mentions: Vec<String>,
    ai_trigger: String,
    default_model: String,
    default_prompt: String,
}

impl MessageRouter {
    pub fn new(
        mentions: Vec<String>,
        ai_trigger: impl Into<String>,
        default_model: impl Into<String>,
        default_prompt: impl Into<String>,
    ) -> Self {
        Self {
            mentions,
            ai_trigger: ai_trigger.into(),
            default_model: default_model.into(),
            default_prompt: default_prompt.into(),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.mentions.clone(),
            config.ai_trigger.clone(),
            config.default_model.clone(),
            config.default_prompt.clone(),
        )
    }

    /// The model in effect for `routing`, falling back to the built-in default.
    pub fn model_for(&self, routing: &RoutingConfig) -> String {
        routing.effective_model(&self.default_model).to_string()
    }

    /// Decides the route for `event`. Never performs I/O.
    pub fn route(
        &self,
        event: &ChatEvent,
        category: Category,
        routing: &RoutingConfig,
        table: &[AutoReply],
    ) -> Route {
        if let Some(model) = parse_set_model(&event.text) {
            debug!(chat_id = event.chat_id, %model, "set-model directive");
            return Route::SetModel { model };
        }

        let system = routing.effective_prompt(&self.default_prompt);
        let model = self.model_for(routing);

        if contains_trigger(&event.text, &self.ai_trigger) {
            return Route::AskAi {
                prompt: build_prompt(system, &event.text, None),
                model,
            };
        }

        if event.is_command {
            let name = event.command_name.as_deref().unwrap_or_default();
            let args = event.command_args.as_deref().unwrap_or_default().trim();
            return match name {
                "run" if !args.is_empty() => Route::RunShell {
                    command_line: args.to_string(),
                },
                "status" => Route::Status,
                _ => Route::Acknowledge {
                    command: name.to_string(),
                },
            };
        }

        if should_respond(event, category, &self.mentions, table) {
            return Route::Reply {
                prompt: build_prompt(system, &event.text, Some(category)),
                model,
                category,
            };
        }

        Route::Ignore
    }
}
