// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ideabot.toml` > `~/.config/ideabot/ideabot.toml` > `/etc/ideabot/ideabot.toml`
//! with environment variable overrides via `IDEABOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::IdeabotConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ideabot/ideabot.toml";

/// Local configuration file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = "ideabot.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ideabot/ideabot.toml`
/// 3. `~/.config/ideabot/ideabot.toml`
/// 4. `./ideabot.toml`
/// 5. `IDEABOT_*` environment variables
pub fn load_config() -> Result<IdeabotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<IdeabotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(IdeabotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<IdeabotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(IdeabotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(IdeabotConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ideabot/ideabot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider mapping `IDEABOT_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `IDEABOT_SHELL_TIMEOUT_SECS` must map to `shell.timeout_secs`.
fn env_provider() -> Env {
    Env::prefixed("IDEABOT_").map(|key| env_key_path(key.as_str()).into())
}

const SECTIONS: &[&str] = &["agent", "telegram", "ollama", "storage", "shell"];

/// Maps `SHELL_TIMEOUT_SECS` to `shell.timeout_secs`. Figment hands over the
/// key in its original case, so it is lowercased before matching.
fn env_key_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
