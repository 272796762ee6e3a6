// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform emote catalogs: the global set and a channel's own set.

use async_trait::async_trait;
use chatpulse_core::emote::Emote;
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::EmoteCatalog;
use serde::Deserialize;

use crate::http::{endpoint, get_json, HelixAuth};

#[derive(Debug, Deserialize)]
struct EmotesResponse {
    #[serde(default)]
    data: Vec<HelixEmote>,
}

#[derive(Debug, Deserialize)]
struct HelixEmote {
    name: String,
    images: HelixImages,
}

#[derive(Debug, Deserialize)]
struct HelixImages {
    url_1x: String,
}

impl From<HelixEmote> for Emote {
    fn from(e: HelixEmote) -> Self {
        Emote::new(e.name, e.images.url_1x)
    }
}

async fn fetch_helix(
    provider: &str,
    client: &reqwest::Client,
    auth: &HelixAuth,
    base_url: &str,
    params: &[(&str, &str)],
) -> Result<Vec<Emote>, ChatpulseError> {
    let path = if params.is_empty() {
        "chat/emotes/global"
    } else {
        "chat/emotes"
    };
    let url = endpoint(provider, base_url, path, params)?;
    let body: EmotesResponse = get_json(provider, auth.apply(client.get(url))).await?;
    Ok(body.data.into_iter().map(Emote::from).collect())
}

/// Emotes available in every channel.
#[derive(Debug, Clone)]
pub struct TwitchGlobalCatalog {
    client: reqwest::Client,
    auth: HelixAuth,
    base_url: String,
}

impl TwitchGlobalCatalog {
    pub fn new(client: reqwest::Client, auth: HelixAuth, base_url: impl Into<String>) -> Self {
        Self {
            client,
            auth,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl EmoteCatalog for TwitchGlobalCatalog {
    fn name(&self) -> &str {
        "twitch-global"
    }

    async fn fetch(&self, _channel_id: &str) -> Result<Vec<Emote>, ChatpulseError> {
        fetch_helix(self.name(), &self.client, &self.auth, &self.base_url, &[]).await
    }
}

/// Emotes owned by one broadcaster.
#[derive(Debug, Clone)]
pub struct TwitchChannelCatalog {
    client: reqwest::Client,
    auth: HelixAuth,
    base_url: String,
}

impl TwitchChannelCatalog {
    pub fn new(client: reqwest::Client, auth: HelixAuth, base_url: impl Into<String>) -> Self {
        Self {
            client,
            auth,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl EmoteCatalog for TwitchChannelCatalog {
    fn name(&self) -> &str {
        "twitch-channel"
    }

    async fn fetch(&self, channel_id: &str) -> Result<Vec<Emote>, ChatpulseError> {
        fetch_helix(
            self.name(),
            &self.client,
            &self.auth,
            &self.base_url,
            &[("broadcaster_id", channel_id)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parts() -> (reqwest::Client, HelixAuth) {
        (
            crate::http::build_client(Duration::from_secs(5)).unwrap(),
            HelixAuth::new("cid", "tok").unwrap(),
        )
    }

    fn body() -> serde_json::Value {
        serde_json::json!({
            "data": [
                {"id": "1", "name": "Kappa", "images": {"url_1x": "https://img/kappa/1x", "url_2x": "x"}},
                {"id": "2", "name": "PogChamp", "images": {"url_1x": "https://img/pog/1x"}}
            ],
            "template": "ignored"
        })
    }

    #[tokio::test]
    async fn global_catalog_sends_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/emotes/global"))
            .and(header("Client-Id", "cid"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .mount(&server)
            .await;

        let (client, auth) = parts();
        let emotes = TwitchGlobalCatalog::new(client, auth, server.uri())
            .fetch("")
            .await
            .unwrap();
        assert_eq!(
            emotes,
            vec![
                Emote::new("Kappa", "https://img/kappa/1x"),
                Emote::new("PogChamp", "https://img/pog/1x"),
            ]
        );
    }

    #[tokio::test]
    async fn channel_catalog_queries_by_broadcaster() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/emotes"))
            .and(query_param("broadcaster_id", "141981764"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .mount(&server)
            .await;

        let (client, auth) = parts();
        let emotes = TwitchChannelCatalog::new(client, auth, server.uri())
            .fetch("141981764")
            .await
            .unwrap();
        assert_eq!(emotes.len(), 2);
    }

    #[tokio::test]
    async fn unauthorized_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (client, auth) = parts();
        let err = TwitchGlobalCatalog::new(client, auth, server.uri())
            .fetch("")
            .await
            .unwrap_err();
        assert!(
            matches!(err, ChatpulseError::Provider { ref provider, .. } if provider == "twitch-global")
        );
    }
}
