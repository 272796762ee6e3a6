// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session tunables and external collaborators.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chatpulse_analytics::KeywordPolicy;
use chatpulse_classifier::HttpClassifier;
use chatpulse_config::model::ChatpulseConfig;
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::{EmotionClassifier, NoopObserver, ObservabilityAdapter};
use chatpulse_core::types::ChannelCredentials;
use chatpulse_emotes::EmoteResolver;

/// Numeric knobs of a channel session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub capacity: usize,
    pub emotion_window_ms: u64,
    pub keyword_top_k: usize,
    pub rate_bucket_ms: u64,
    pub rate_buckets: usize,
    pub max_in_flight: usize,
    pub color_seed: u64,
    /// Capacity of the ingestion to store channel.
    pub event_buffer: usize,
    /// Upper bound between two view recomputations when nothing is appended.
    pub refresh_interval: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &ChatpulseConfig) -> Self {
        Self {
            capacity: config.store.capacity,
            emotion_window_ms: config.analytics.emotion_window_ms,
            keyword_top_k: config.analytics.keyword_top_k,
            rate_bucket_ms: config.analytics.rate_bucket_ms,
            rate_buckets: config.analytics.rate_buckets,
            max_in_flight: config.classifier.max_in_flight,
            color_seed: config.agent.color_seed,
            event_buffer: 256,
            refresh_interval: Duration::from_millis(config.analytics.rate_bucket_ms.max(1)),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&ChatpulseConfig::default())
    }
}

/// Builds a fresh resolver for each session.
pub type ResolverFactory = Arc<dyn Fn() -> EmoteResolver + Send + Sync>;

/// Everything a session talks to outside the process.
#[derive(Clone)]
pub struct Collaborators {
    pub irc_url: String,
    pub credentials: ChannelCredentials,
    /// `None` runs without enrichment.
    pub classifier: Option<Arc<dyn EmotionClassifier>>,
    pub resolver: ResolverFactory,
    pub observer: Arc<dyn ObservabilityAdapter>,
    pub keyword_policy: KeywordPolicy,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("irc_url", &self.irc_url)
            .field("credentials", &self.credentials)
            .field("classifier", &self.classifier.is_some())
            .field("keyword_policy", &self.keyword_policy)
            .finish_non_exhaustive()
    }
}

impl Collaborators {
    /// Wires the HTTP classifier, the standard emote catalogs, and the
    /// configured stopwords.
    ///
    /// Fails when `twitch.nick` or `twitch.access_token` is missing.
    pub fn from_config(
        config: &ChatpulseConfig,
        observer: Arc<dyn ObservabilityAdapter>,
    ) -> Result<Self, ChatpulseError> {
        let nick = config.twitch.nick.as_deref().ok_or_else(|| {
            ChatpulseError::Config("twitch.nick is required to join a channel".into())
        })?;
        let token = config.twitch.access_token.as_deref().ok_or_else(|| {
            ChatpulseError::Config("twitch.access_token is required to join a channel".into())
        })?;

        let classifier: Option<Arc<dyn EmotionClassifier>> = if config.classifier.enabled {
            Some(Arc::new(HttpClassifier::from_config(&config.classifier)?))
        } else {
            None
        };

        // Validated once here so the factory below cannot fail.
        EmoteResolver::from_config(&config.twitch, &config.emotes)?;
        let twitch = config.twitch.clone();
        let emotes = config.emotes.clone();
        let resolver_observer = Arc::clone(&observer);
        let resolver: ResolverFactory = Arc::new(move || {
            EmoteResolver::from_config(&twitch, &emotes)
                .unwrap_or_else(|_| EmoteResolver::new(Duration::from_secs(emotes.fetch_timeout_secs)))
                .with_observer(Arc::clone(&resolver_observer))
        });

        Ok(Self {
            irc_url: config.twitch.irc_url.clone(),
            credentials: ChannelCredentials::new(nick, token),
            classifier,
            resolver,
            observer,
            keyword_policy: KeywordPolicy::new(&config.analytics.stopwords),
        })
    }

    /// Collaborators for tests and embedding: no classifier, no catalogs,
    /// default stopwords.
    pub fn new(irc_url: impl Into<String>, credentials: ChannelCredentials) -> Self {
        Self {
            irc_url: irc_url.into(),
            credentials,
            classifier: None,
            resolver: Arc::new(|| EmoteResolver::new(Duration::from_secs(10))),
            observer: Arc::new(NoopObserver),
            keyword_policy: KeywordPolicy::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn EmotionClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_resolver(mut self, factory: ResolverFactory) -> Self {
        self.resolver = factory;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ObservabilityAdapter>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_keyword_policy(mut self, policy: KeywordPolicy) -> Self {
        self.keyword_policy = policy;
        self
    }
}
