// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BetterTTV channel catalog.

use async_trait::async_trait;
use chatpulse_core::emote::Emote;
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::EmoteCatalog;
use serde::Deserialize;

use crate::http::{endpoint, get_json};

const CDN_BASE: &str = "https://cdn.betterttv.net/emote";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    #[serde(default)]
    channel_emotes: Vec<BttvEmote>,
    #[serde(default)]
    shared_emotes: Vec<BttvEmote>,
}

#[derive(Debug, Deserialize)]
struct BttvEmote {
    id: String,
    code: String,
}

/// Channel and shared emotes from BetterTTV.
///
/// Shared emotes are listed after channel emotes, so they win on a clash.
#[derive(Debug, Clone)]
pub struct BttvCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl BttvCatalog {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl EmoteCatalog for BttvCatalog {
    fn name(&self) -> &str {
        "bttv"
    }

    async fn fetch(&self, channel_id: &str) -> Result<Vec<Emote>, ChatpulseError> {
        let url = endpoint(
            self.name(),
            &self.base_url,
            &format!("cached/users/twitch/{channel_id}"),
            &[],
        )?;
        let body: UserResponse = get_json(self.name(), self.client.get(url)).await?;
        Ok(body
            .channel_emotes
            .into_iter()
            .chain(body.shared_emotes)
            .map(|e| Emote::new(e.code, format!("{CDN_BASE}/{}/1x", e.id)))
            .collect())
    }
}
