// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emote catalog trait for platform and community emote providers.

use async_trait::async_trait;

use crate::emote::Emote;
use crate::error::ChatpulseError;

/// A remote source of emote definitions.
///
/// Global catalogs ignore `channel_id`; channel-scoped catalogs query by it.
#[async_trait]
pub trait EmoteCatalog: Send + Sync {
    /// Human-readable provider name used in logs and metrics.
    fn name(&self) -> &str;

    /// Fetches the provider's emotes for the channel.
    async fn fetch(&self, channel_id: &str) -> Result<Vec<Emote>, ChatpulseError>;
}
