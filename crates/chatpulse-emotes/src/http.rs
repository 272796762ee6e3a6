// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared HTTP plumbing for the catalog clients.

use std::time::Duration;

use chatpulse_core::error::ChatpulseError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Builds the client used for every catalog request.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ChatpulseError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("chatpulse/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ChatpulseError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Application credentials for the platform REST API.
#[derive(Clone)]
pub struct HelixAuth {
    headers: HeaderMap,
}

impl HelixAuth {
    /// `Client-Id` plus `Authorization: Bearer <token>`.
    pub fn new(client_id: &str, token: &str) -> Result<Self, ChatpulseError> {
        let token = token.strip_prefix("oauth:").unwrap_or(token);
        let mut headers = HeaderMap::new();
        headers.insert(
            "Client-Id",
            HeaderValue::from_str(client_id)
                .map_err(|e| ChatpulseError::Config(format!("invalid client id header value: {e}")))?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ChatpulseError::Config(format!("invalid access token header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        Ok(Self { headers })
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.headers(self.headers.clone())
    }
}

impl std::fmt::Debug for HelixAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HelixAuth([REDACTED])")
    }
}

/// Joins `base` and `path`, appending `params` as an encoded query string.
pub(crate) fn endpoint(
    provider: &str,
    base: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Url, ChatpulseError> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    let parsed = if params.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, params)
    };
    parsed.map_err(|e| ChatpulseError::provider(provider, format!("invalid URL {raw}: {e}")))
}

/// Sends `request` and decodes a JSON body. Non-2xx is a provider error.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T, ChatpulseError> {
    let response = request.send().await.map_err(|e| ChatpulseError::Provider {
        provider: provider.to_string(),
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    })?;

    let status = response.status();
    debug!(provider, status = %status, "catalog response received");
    if !status.is_success() {
        return Err(ChatpulseError::provider(provider, format!("HTTP {status}")));
    }

    response.json::<T>().await.map_err(|e| ChatpulseError::Provider {
        provider: provider.to_string(),
        message: format!("failed to parse response: {e}"),
        source: Some(Box::new(e)),
    })
}
