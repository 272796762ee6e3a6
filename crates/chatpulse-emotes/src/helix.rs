// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel login to broadcaster id lookup.

use chatpulse_core::error::ChatpulseError;
use serde::Deserialize;
use tracing::debug;

use crate::http::{endpoint, get_json, HelixAuth};

const PROVIDER: &str = "helix";

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    data: Vec<HelixUser>,
}

#[derive(Debug, Deserialize)]
struct HelixUser {
    id: String,
}

/// Client for the platform users endpoint.
#[derive(Debug, Clone)]
pub struct HelixClient {
    client: reqwest::Client,
    auth: HelixAuth,
    base_url: String,
}

impl HelixClient {
    pub fn new(client: reqwest::Client, auth: HelixAuth, base_url: impl Into<String>) -> Self {
        Self {
            client,
            auth,
            base_url: base_url.into(),
        }
    }

    /// Returns the numeric id for `login`, or `None` if no such user exists.
    pub async fn lookup_broadcaster_id(&self, login: &str) -> Result<Option<String>, ChatpulseError> {
        let login = login.trim().trim_start_matches('#').to_ascii_lowercase();
        let url = endpoint(PROVIDER, &self.base_url, "users", &[("login", login.as_str())])?;
        let body: UsersResponse =
            get_json(PROVIDER, self.auth.apply(self.client.get(url))).await?;
        let id = body.data.into_iter().next().map(|user| user.id);
        debug!(login = %login, found = id.is_some(), "broadcaster lookup finished");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn helix(uri: String) -> HelixClient {
        HelixClient::new(
            crate::http::build_client(Duration::from_secs(5)).unwrap(),
            HelixAuth::new("cid", "tok").unwrap(),
            uri,
        )
    }

    #[tokio::test]
    async fn resolves_login_to_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("login", "streamer"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "141981764", "login": "streamer", "display_name": "Streamer"}]
            })))
            .mount(&server)
            .await;

        let id = helix(server.uri()).lookup_broadcaster_id("#Streamer").await.unwrap();
        assert_eq!(id.as_deref(), Some("141981764"));
    }

    #[tokio::test]
    async fn unknown_login_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        assert!(helix(server.uri()).lookup_broadcaster_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn server_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = helix(server.uri()).lookup_broadcaster_id("x").await.unwrap_err();
        assert!(matches!(err, ChatpulseError::Provider { .. }));
    }
}
