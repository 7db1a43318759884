// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for the generative text backend.

use async_trait::async_trait;

use crate::error::IdeabotError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for a request/response text generation backend keyed by model name.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Generates a completion for `prompt` with `model`.
    ///
    /// An empty `model` selects the adapter's built-in default. Exactly one
    /// request is made; failures surface as [`IdeabotError::Provider`], or
    /// [`IdeabotError::Timeout`] when the backend does not answer in time.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, IdeabotError>;
}
