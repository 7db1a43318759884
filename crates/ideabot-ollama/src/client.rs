// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a local Ollama server.
//!
//! One attempt per call. The caller owns any fallback behaviour.

use std::time::Duration;

use ideabot_core::IdeabotError;
use tracing::debug;

use crate::types::{GenerateRequest, GenerateResponse, TagsResponse};

/// Thin wrapper over `reqwest` for the `generate` and `tags` endpoints.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, IdeabotError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdeabotError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                body: None,
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs a non-streaming generation and returns the trimmed `response`.
    ///
    /// Any body without a `response` field (error payloads included) becomes
    /// a provider error carrying that body.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, IdeabotError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        debug!(%status, model, bytes = body.len(), "generate response received");

        match serde_json::from_str::<GenerateResponse>(&body) {
            Ok(decoded) => Ok(decoded.response.trim().to_string()),
            Err(_) => Err(IdeabotError::Provider {
                message: format!("ollama response: {body}"),
                body: Some(body),
                source: None,
            }),
        }
    }

    /// Names of the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>, IdeabotError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(IdeabotError::Provider {
                message: format!("ollama returned {status}"),
                body: Some(body),
                source: None,
            });
        }

        let tags: TagsResponse =
            serde_json::from_str(&body).map_err(|e| IdeabotError::Provider {
                message: format!("failed to parse model list: {e}"),
                body: Some(body.clone()),
                source: Some(Box::new(e)),
            })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    fn transport_error(&self, e: reqwest::Error) -> IdeabotError {
        if e.is_timeout() {
            return IdeabotError::Timeout {
                duration: self.timeout,
            };
        }
        IdeabotError::Provider {
            message: format!("HTTP request failed: {e}"),
            body: None,
            source: Some(Box::new(e)),
        }
    }
}
