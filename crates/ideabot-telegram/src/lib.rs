// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter.
//!
//! Implements [`ChannelAdapter`] over the Telegram Bot API via teloxide long
//! polling. Inbound messages are converted to [`ChatEvent`]s and queued on
//! an mpsc channel that [`ChannelAdapter::receive`] drains.

pub mod handler;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ideabot_config::model::TelegramConfig;
use ideabot_core::{
    AdapterType, ChannelAdapter, ChatEvent, HealthStatus, IdeabotError, OutboundReply,
    PluginAdapter,
};
use teloxide::dispatching::ShutdownToken;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::update_listeners::Polling;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram's limit on message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<ChatEvent>>,
    inbound_tx: mpsc::Sender<ChatEvent>,
    polling: Option<(tokio::task::JoinHandle<()>, ShutdownToken)>,
}

impl TelegramChannel {
    /// Creates an adapter for `token`. Fails on an empty token.
    pub fn new(token: &str, config: TelegramConfig) -> Result<Self, IdeabotError> {
        if token.trim().is_empty() {
            return Err(IdeabotError::Config("telegram bot token cannot be empty".into()));
        }
        let (inbound_tx, inbound_rx) = mpsc::channel(100);
        Ok(Self {
            bot: Bot::new(token),
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling: None,
        })
    }
}

impl TelegramChannel {
    /// Stops accepting inbound events. Pending and future sends fail, events
    /// already queued can still be received.
    async fn close_inbound(&self) {
        self.inbound_rx.lock().await.close();
    }
}

/// Cuts `text` to at most [`MAX_MESSAGE_CHARS`] characters.
pub fn clamp_message(text: &str) -> &str {
    match text.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, IdeabotError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("Telegram bot unreachable: {e}"))),
        }
    }

    /// Stops long polling. Waits for the dispatcher to finish in-flight
    /// updates before returning.
    async fn shutdown(&self) -> Result<(), IdeabotError> {
        let Some((_, token)) = &self.polling else {
            return Ok(());
        };
        // Handlers parked on a full queue must fail fast, or the dispatcher
        // never finishes.
        self.close_inbound().await;
        match token.shutdown() {
            Ok(done) => {
                done.await;
                info!("Telegram polling stopped");
            }
            Err(_) => debug!("Telegram dispatcher was not running"),
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), IdeabotError> {
        if self.polling.is_some() {
            return Ok(());
        }

        let me = self.bot.get_me().await.map_err(|e| IdeabotError::Channel {
            message: format!("failed to reach Telegram: {e}"),
            source: Some(Box::new(e)),
        })?;
        info!(username = %me.username(), "authorized on Telegram");

        let tx = self.inbound_tx.clone();
        let allowed_users: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());
        let handler = Update::filter_message().endpoint(move |msg: Message| {
            let tx = tx.clone();
            let allowed = allowed_users.clone();
            async move {
                if !handler::is_authorized(&msg, &allowed) {
                    debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                    return respond(());
                }
                match handler::to_chat_event(&msg) {
                    Some(event) => {
                        if tx.send(event).await.is_err() {
                            warn!("inbound channel closed, dropping message");
                        }
                    }
                    None => debug!(chat_id = msg.chat.id.0, "ignoring message without sender"),
                }
                respond(())
            }
        });

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|_| async {})
            .build();
        let token = dispatcher.shutdown_token();

        let bot = self.bot.clone();
        let timeout = Duration::from_secs(u64::from(self.config.poll_timeout_secs));
        let handle = tokio::spawn(async move {
            let listener = Polling::builder(bot)
                .timeout(timeout)
                .delete_webhook()
                .await
                .build();
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("Telegram update listener error"),
                )
                .await;
        });

        info!(poll_timeout_secs = self.config.poll_timeout_secs, "starting Telegram long polling");
        self.polling = Some((handle, token));
        Ok(())
    }

    async fn send(&self, reply: OutboundReply) -> Result<(), IdeabotError> {
        self.bot
            .send_message(ChatId(reply.chat_id), clamp_message(&reply.text))
            .await
            .map_err(|e| IdeabotError::Channel {
                message: format!("failed to send message: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn receive(&self) -> Result<ChatEvent, IdeabotError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| IdeabotError::ChannelClosed("telegram".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        assert!(TelegramChannel::new("  ", TelegramConfig::default()).is_err());
    }

    #[test]
    fn token_is_accepted() {
        let channel = TelegramChannel::new("123456:ABC-DEF", TelegramConfig::default()).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }

    #[test]
    fn long_messages_are_clamped_on_char_boundary() {
        let text = "é".repeat(MAX_MESSAGE_CHARS + 10);
        let clamped = clamp_message(&text);
        assert_eq!(clamped.chars().count(), MAX_MESSAGE_CHARS);
        assert_eq!(clamp_message("short"), "short");
    }

    #[tokio::test]
    async fn closing_inbound_releases_blocked_senders() {
        let channel = TelegramChannel::new("123456:ABC-DEF", TelegramConfig::default()).unwrap();
        let tx = channel.inbound_tx.clone();
        while tx.try_send(ChatEvent::text(1, 1, "a", "burst")).is_ok() {}

        let blocked = tokio::spawn({
            let tx = tx.clone();
            async move { tx.send(ChatEvent::text(1, 1, "a", "late")).await }
        });
        tokio::task::yield_now().await;
        assert!(!blocked.is_finished());

        channel.close_inbound().await;
        let sent = tokio::time::timeout(Duration::from_secs(5), blocked)
            .await
            .expect("sender stayed blocked")
            .unwrap();
        assert!(sent.is_err());
        assert_eq!(channel.receive().await.unwrap().text, "burst");
    }

    #[tokio::test]
    async fn receive_reports_closed_stream() {
        let channel = TelegramChannel::new("123456:ABC-DEF", TelegramConfig::default()).unwrap();
        channel.close_inbound().await;
        let err = channel.receive().await.unwrap_err();
        assert!(matches!(err, IdeabotError::ChannelClosed(_)));
    }

    #[tokio::test]
    async fn shutdown_without_connect_is_noop() {
        let channel = TelegramChannel::new("123456:ABC-DEF", TelegramConfig::default()).unwrap();
        channel.shutdown().await.unwrap();
    }
}
