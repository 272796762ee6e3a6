// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 7TV channel catalog.

use async_trait::async_trait;
use chatpulse_core::emote::Emote;
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::EmoteCatalog;
use serde::Deserialize;

use crate::http::{endpoint, get_json};

const CDN_BASE: &str = "https://cdn.7tv.app/emote";

#[derive(Debug, Deserialize)]
struct SevenTvEmote {
    id: String,
    name: String,
}

#[derive(Debug, Clone)]
pub struct SevenTvCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl SevenTvCatalog {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl EmoteCatalog for SevenTvCatalog {
    fn name(&self) -> &str {
        "7tv"
    }

    async fn fetch(&self, channel_id: &str) -> Result<Vec<Emote>, ChatpulseError> {
        let url = endpoint(
            self.name(),
            &self.base_url,
            &format!("users/{channel_id}/emotes"),
            &[],
        )?;
        let body: Vec<SevenTvEmote> = get_json(self.name(), self.client.get(url)).await?;
        Ok(body
            .into_iter()
            .map(|e| Emote::new(e.name, format!("{CDN_BASE}/{}/1x", e.id)))
            .collect())
    }
}
