// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-zero bounds and well-formed endpoint URLs.

use crate::diagnostic::ConfigError;
use crate::model::ChatpulseConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ChatpulseConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.store.capacity == 0 {
        fail("store.capacity must be at least 1".to_string());
    }

    if config.analytics.emotion_window_ms == 0 {
        fail("analytics.emotion_window_ms must be greater than 0".to_string());
    }

    if config.analytics.keyword_top_k == 0 {
        fail("analytics.keyword_top_k must be at least 1".to_string());
    }

    if config.analytics.rate_bucket_ms == 0 || config.analytics.rate_buckets == 0 {
        fail("analytics.rate_bucket_ms and analytics.rate_buckets must be non-zero".to_string());
    }

    if config.classifier.max_in_flight == 0 {
        fail("classifier.max_in_flight must be at least 1".to_string());
    }

    if config.classifier.timeout_ms == 0 {
        fail("classifier.timeout_ms must be greater than 0".to_string());
    }

    if config.emotes.fetch_timeout_secs == 0 {
        fail("emotes.fetch_timeout_secs must be greater than 0".to_string());
    }

    if config.gateway.port == 0 {
        fail("gateway.port must be non-zero".to_string());
    }

    let urls = [
        ("twitch.irc_url", &config.twitch.irc_url, &["ws://", "wss://"][..]),
        ("twitch.helix_base_url", &config.twitch.helix_base_url, &["http://", "https://"][..]),
        ("emotes.bttv_base_url", &config.emotes.bttv_base_url, &["http://", "https://"][..]),
        ("emotes.seventv_base_url", &config.emotes.seventv_base_url, &["http://", "https://"][..]),
        ("classifier.url", &config.classifier.url, &["http://", "https://"][..]),
    ];
    for (key, url, schemes) in urls {
        if !schemes.iter().any(|s| url.starts_with(s)) {
            fail(format!(
                "{key} `{url}` must start with one of: {}",
                schemes.join(", ")
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
