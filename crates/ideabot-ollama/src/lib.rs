// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama provider adapter.
//!
//! Implements [`ProviderAdapter`] over a local Ollama server's non-streaming
//! `generate` endpoint.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use ideabot_config::model::OllamaConfig;
use ideabot_core::{AdapterType, HealthStatus, IdeabotError, PluginAdapter, ProviderAdapter};
use tracing::{debug, warn};

pub use client::OllamaClient;

/// Model used when neither the caller nor the provider names one.
pub const DEFAULT_MODEL: &str = "llama3";

pub struct OllamaProvider {
    client: OllamaClient,
    default_model: String,
}

impl OllamaProvider {
    pub fn new(config: &OllamaConfig) -> Result<Self, IdeabotError> {
        let client = OllamaClient::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            client,
            default_model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Overrides the model used for empty model names.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.default_model = model;
        }
        self
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>, IdeabotError> {
        self.client.list_models().await
    }
}

#[async_trait]
impl PluginAdapter for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, IdeabotError> {
        match self.client.list_models().await {
            Ok(models) if models.is_empty() => {
                Ok(HealthStatus::Degraded("no models installed".into()))
            }
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => {
                warn!(base_url = self.client.base_url(), error = %e, "ollama unreachable");
                Ok(HealthStatus::Unhealthy(e.to_string()))
            }
        }
    }

    async fn shutdown(&self) -> Result<(), IdeabotError> {
        debug!("ollama provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OllamaProvider {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, IdeabotError> {
        let model = if model.trim().is_empty() {
            self.default_model.as_str()
        } else {
            model
        };
        self.client.generate(model, prompt).await
    }
}
