// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generative backend with scripted answers.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use ideabot_core::{AdapterType, HealthStatus, IdeabotError, PluginAdapter, ProviderAdapter};
use tokio::sync::Mutex;

/// A prompt/model pair the provider was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub prompt: String,
    pub model: String,
}

/// Scripted answers are consumed in FIFO order. `Err` entries become
/// provider errors carrying the string as body. When the script runs out
/// the provider answers `"mock response"`, or fails if built with
/// [`MockProvider::failing`].
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    fail_when_empty: bool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_when_empty: false,
        }
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        let provider = Self::new();
        let script = responses.into_iter().map(Ok).collect();
        Self {
            script: Arc::new(Mutex::new(script)),
            ..provider
        }
    }

    /// A provider that is always unreachable.
    pub fn failing() -> Self {
        Self {
            fail_when_empty: true,
            ..Self::new()
        }
    }

    pub async fn push_response(&self, text: &str) {
        self.script.lock().await.push_back(Ok(text.to_string()));
    }

    pub async fn push_error(&self, body: &str) {
        self.script.lock().await.push_back(Err(body.to_string()));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, IdeabotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), IdeabotError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, IdeabotError> {
        self.requests.lock().await.push(RecordedRequest {
            prompt: prompt.to_string(),
            model: model.to_string(),
        });

        let next = self.script.lock().await.pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(body)) => Err(IdeabotError::Provider {
                message: format!("ollama response: {body}"),
                body: Some(body),
                source: None,
            }),
            None if self.fail_when_empty => Err(IdeabotError::Provider {
                message: "HTTP request failed: connection refused".into(),
                body: None,
                source: None,
            }),
            None => Ok("mock response".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_then_default() {
        let provider = MockProvider::with_responses(vec!["one".into()]);
        provider.push_error("{\"error\":\"x\"}").await;

        assert_eq!(provider.generate("p", "m").await.unwrap(), "one");
        assert!(provider.generate("p", "m").await.is_err());
        assert_eq!(provider.generate("p", "m").await.unwrap(), "mock response");
        assert_eq!(provider.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn failing_provider_always_errors() {
        let provider = MockProvider::failing();
        assert!(provider.generate("p", "").await.is_err());
    }
}
