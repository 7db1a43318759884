// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared, lock-guarded handle to the live routing configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ideabot_core::{BotConfig, IdeabotError, RoutingConfig};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::json_store::{self, Loaded};

/// Process-wide owner of `configs.json`.
///
/// Cloning is cheap and every clone sees the same state. Each mutation holds
/// the lock across its whole modify-then-persist cycle.
#[derive(Clone)]
pub struct RoutingStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    config: Mutex<RoutingConfig>,
}

impl RoutingStore {
    /// Loads `path`, creating it with defaults when missing.
    ///
    /// A corrupt file is logged and replaced in memory by defaults; the file
    /// itself is left alone until the next successful mutation.
    pub async fn load_or_create(path: impl Into<PathBuf>) -> Result<Self, IdeabotError> {
        let path = path.into();
        let config = match json_store::load::<RoutingConfig>(&path).await? {
            Loaded::Value(config) => config,
            Loaded::Missing => {
                let config = RoutingConfig::default();
                json_store::save(&path, &config).await?;
                info!(path = %path.display(), "created default routing config");
                config
            }
            Loaded::Corrupt(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "routing config is corrupt, using defaults"
                );
                RoutingConfig::default()
            }
        };
        Ok(Self::with_config(path, config))
    }

    /// Wraps an already-loaded config without touching the file.
    pub fn with_config(path: impl Into<PathBuf>, config: RoutingConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                config: Mutex::new(config),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// A copy of the current configuration.
    pub async fn snapshot(&self) -> RoutingConfig {
        self.inner.config.lock().await.clone()
    }

    /// Sets the default AI model and persists.
    ///
    /// The in-memory value changes even when the write fails, so the new
    /// model stays in effect for the rest of the process lifetime.
    pub async fn set_ai_model(&self, model: &str) -> Result<(), IdeabotError> {
        self.mutate(|config| config.default_ai_model = model.to_string())
            .await
    }

    /// Registers (or replaces) a bot, optionally making it the default.
    pub async fn add_bot(&self, bot: BotConfig, make_default: bool) -> Result<(), IdeabotError> {
        self.mutate(move |config| {
            if make_default {
                config.default_bot_id = bot.id.clone();
            }
            config.bots.insert(bot.id.clone(), bot);
        })
        .await
    }

    async fn mutate<F>(&self, f: F) -> Result<(), IdeabotError>
    where
        F: FnOnce(&mut RoutingConfig),
    {
        let mut guard = self.inner.config.lock().await;
        f(&mut guard);
        json_store::save(&self.inner.path, &*guard).await
    }
}
