// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatpulse config` command implementation.

use chatpulse_config::model::ChatpulseConfig;
use chatpulse_core::error::ChatpulseError;

const REDACTED: &str = "[REDACTED]";

/// Copy of `config` safe to print.
pub fn redacted(config: &ChatpulseConfig) -> ChatpulseConfig {
    let mut config = config.clone();
    if config.twitch.access_token.is_some() {
        config.twitch.access_token = Some(REDACTED.to_string());
    }
    config
}

/// Prints the effective configuration as TOML.
pub fn print_config(config: &ChatpulseConfig) -> Result<(), ChatpulseError> {
    let rendered = toml::to_string_pretty(&redacted(config))
        .map_err(|e| ChatpulseError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}
