// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./chatpulse.toml` > `~/.config/chatpulse/chatpulse.toml` >
//! `/etc/chatpulse/chatpulse.toml` with environment variable overrides via `CHATPULSE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ChatpulseConfig;

/// Config sections that environment variables may address.
const SECTIONS: &[&str] = &[
    "agent",
    "twitch",
    "store",
    "analytics",
    "emotes",
    "classifier",
    "gateway",
];

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/chatpulse/chatpulse.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "chatpulse.toml";

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("chatpulse/chatpulse.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/chatpulse/chatpulse.toml` (system-wide)
/// 3. `~/.config/chatpulse/chatpulse.toml` (user XDG config)
/// 4. `./chatpulse.toml` (local directory)
/// 5. `CHATPULSE_*` environment variables
pub fn load_config() -> Result<ChatpulseConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ChatpulseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatpulseConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ChatpulseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatpulseConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ChatpulseConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `CHATPULSE_TWITCH_ACCESS_TOKEN` maps to `twitch.access_token`, not
/// `twitch.access.token`.
fn env_provider() -> Env {
    Env::prefixed("CHATPULSE_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
