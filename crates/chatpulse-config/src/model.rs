// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Chatpulse pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Chatpulse configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatpulseConfig {
    /// Process-level settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Upstream chat connection and platform API settings.
    #[serde(default)]
    pub twitch: TwitchConfig,

    /// Message store retention.
    #[serde(default)]
    pub store: StoreConfig,

    /// Derived view parameters.
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Community emote catalog endpoints.
    #[serde(default)]
    pub emotes: EmotesConfig,

    /// Emotion classifier endpoint.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// HTTP surface for rendering collaborators.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seed for per-user color hashing.
    #[serde(default = "default_color_seed")]
    pub color_seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            color_seed: default_color_seed(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_color_seed() -> u64 {
    0x6368_6174_7075_6c73
}

/// Upstream chat and platform API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwitchConfig {
    /// Websocket URL of the chat endpoint.
    #[serde(default = "default_irc_url")]
    pub irc_url: String,

    /// Login name sent as the identity. `None` requires the env var.
    #[serde(default)]
    pub nick: Option<String>,

    /// OAuth bearer token, without the `oauth:` prefix.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Application client id sent to the platform API.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Base URL of the platform REST API.
    #[serde(default = "default_helix_base_url")]
    pub helix_base_url: String,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            irc_url: default_irc_url(),
            nick: None,
            access_token: None,
            client_id: None,
            helix_base_url: default_helix_base_url(),
        }
    }
}

fn default_irc_url() -> String {
    "wss://irc-ws.chat.twitch.tv:443".to_string()
}

fn default_helix_base_url() -> String {
    "https://api.twitch.tv/helix".to_string()
}

/// Message store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Maximum number of recent events kept in memory.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    100
}

/// Derived view configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Trailing window for the emotion aggregate, in milliseconds.
    #[serde(default = "default_emotion_window_ms")]
    pub emotion_window_ms: u64,

    /// Number of entries in the keyword ranking.
    #[serde(default = "default_keyword_top_k")]
    pub keyword_top_k: usize,

    /// Lower-case words excluded from the keyword ranking.
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,

    /// Width of one message-rate bucket, in milliseconds.
    #[serde(default = "default_rate_bucket_ms")]
    pub rate_bucket_ms: u64,

    /// Number of message-rate buckets.
    #[serde(default = "default_rate_buckets")]
    pub rate_buckets: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            emotion_window_ms: default_emotion_window_ms(),
            keyword_top_k: default_keyword_top_k(),
            stopwords: default_stopwords(),
            rate_bucket_ms: default_rate_bucket_ms(),
            rate_buckets: default_rate_buckets(),
        }
    }
}

fn default_emotion_window_ms() -> u64 {
    60_000
}

fn default_keyword_top_k() -> usize {
    25
}

fn default_stopwords() -> Vec<String> {
    ["the", "and", "is", "in", "to"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_rate_bucket_ms() -> u64 {
    1_000
}

fn default_rate_buckets() -> usize {
    60
}

/// Community emote catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmotesConfig {
    /// BetterTTV API base URL.
    #[serde(default = "default_bttv_base_url")]
    pub bttv_base_url: String,

    /// 7TV API base URL.
    #[serde(default = "default_seventv_base_url")]
    pub seventv_base_url: String,

    /// Per-provider fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for EmotesConfig {
    fn default() -> Self {
        Self {
            bttv_base_url: default_bttv_base_url(),
            seventv_base_url: default_seventv_base_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_bttv_base_url() -> String {
    "https://api.betterttv.net/3".to_string()
}

fn default_seventv_base_url() -> String {
    "https://api.7tv.app/v2".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Emotion classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Set to false to run without enrichment.
    #[serde(default = "default_classifier_enabled")]
    pub enabled: bool,

    /// Full URL of the analyze endpoint.
    #[serde(default = "default_classifier_url")]
    pub url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_classifier_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum concurrent classification calls.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_classifier_enabled(),
            url: default_classifier_url(),
            timeout_ms: default_classifier_timeout_ms(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_classifier_enabled() -> bool {
    true
}

fn default_classifier_url() -> String {
    "http://localhost:8000/api/analyze".to_string()
}

fn default_classifier_timeout_ms() -> u64 {
    5_000
}

fn default_max_in_flight() -> usize {
    32
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3030
}
