// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel with injectable inbound events and captured replies.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use ideabot_core::{
    AdapterType, ChannelAdapter, ChatEvent, HealthStatus, IdeabotError, OutboundReply,
    PluginAdapter,
};
use tokio::sync::{Mutex, Notify};

/// Clones share the same queues, so a test can keep one clone for
/// assertions after handing another to the agent loop.
#[derive(Clone, Default)]
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<Result<ChatEvent, String>>>>,
    sent: Arc<Mutex<Vec<OutboundReply>>>,
    notify: Arc<Notify>,
    closed: Arc<AtomicBool>,
    fail_sends: Arc<AtomicBool>,
    shut_down: Arc<AtomicBool>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn inject(&self, event: ChatEvent) {
        self.inbound.lock().await.push_back(Ok(event));
        self.notify.notify_one();
    }

    /// Queues a transient receive failure at the current position.
    pub async fn inject_receive_error(&self, message: &str) {
        self.inbound.lock().await.push_back(Err(message.to_string()));
        self.notify.notify_one();
    }

    /// Makes `receive` report a closed channel once the queue is drained.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Makes every subsequent `send` fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<OutboundReply> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub fn was_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, IdeabotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), IdeabotError> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), IdeabotError> {
        Ok(())
    }

    async fn send(&self, reply: OutboundReply) -> Result<(), IdeabotError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(IdeabotError::Channel {
                message: "mock send failure".into(),
                source: None,
            });
        }
        self.sent.lock().await.push(reply);
        Ok(())
    }

    async fn receive(&self) -> Result<ChatEvent, IdeabotError> {
        loop {
            if let Some(next) = self.inbound.lock().await.pop_front() {
                return next.map_err(|message| IdeabotError::Channel {
                    message,
                    source: None,
                });
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(IdeabotError::ChannelClosed("mock-channel".into()));
            }
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn receive_returns_injected_events_in_order() {
        let channel = MockChannel::new();
        channel.inject(ChatEvent::text(1, 1, "a", "first")).await;
        channel.inject(ChatEvent::text(1, 1, "a", "second")).await;
        assert_eq!(channel.receive().await.unwrap().text, "first");
        assert_eq!(channel.receive().await.unwrap().text, "second");
    }

    #[tokio::test]
    async fn closed_channel_errors_after_drain() {
        let channel = MockChannel::new();
        channel.inject(ChatEvent::text(1, 1, "a", "last")).await;
        channel.close();
        assert!(channel.receive().await.is_ok());
        let err = channel.receive().await.unwrap_err();
        assert!(matches!(err, IdeabotError::ChannelClosed(_)));
    }

    #[tokio::test]
    async fn clones_share_sent_replies() {
        let channel = MockChannel::new();
        let other = channel.clone();
        other
            .send(OutboundReply {
                chat_id: 1,
                text: "hi".into(),
            })
            .await
            .unwrap();
        assert_eq!(channel.sent_count().await, 1);
    }
}
