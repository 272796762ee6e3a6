// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock emote catalog for deterministic testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chatpulse_core::emote::Emote;
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::EmoteCatalog;

/// A catalog that returns a fixed emote list, or fails on every fetch.
pub struct MockCatalog {
    name: String,
    emotes: Vec<Emote>,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockCatalog {
    /// Catalog answering with `emotes`.
    pub fn new(name: impl Into<String>, emotes: Vec<Emote>) -> Self {
        Self {
            name: name.into(),
            emotes,
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Catalog that always fails with a provider error.
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            fail: true,
            ..Self::new(name, Vec::new())
        }
    }

    /// Convenience constructor from `(token, image)` pairs.
    pub fn with_pairs(name: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        Self::new(
            name,
            pairs
                .iter()
                .map(|(token, image)| Emote::new(*token, *image))
                .collect(),
        )
    }

    /// Sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmoteCatalog for MockCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _channel_id: &str) -> Result<Vec<Emote>, ChatpulseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ChatpulseError::provider(&self.name, "mock failure"));
        }
        Ok(self.emotes.clone())
    }
}
