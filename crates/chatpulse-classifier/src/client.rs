// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the emotion analysis endpoint.
//!
//! One POST per message. Failures are not retried.

use std::time::Duration;

use async_trait::async_trait;
use chatpulse_config::model::ClassifierConfig;
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::EmotionClassifier;
use chatpulse_core::types::EmotionScores;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    content: &'a str,
}

/// `{"sentiment": {"sentiment": {label, score}, "emotions": {label: score}}}`.
/// Only `emotions` is read; the overall star rating is ignored.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    sentiment: Analysis,
}

#[derive(Debug, Deserialize)]
struct Analysis {
    emotions: EmotionScores,
}

/// Classifier backed by the analysis service.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpClassifier {
    /// Creates a client posting to `url` with a per-request `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ChatpulseError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatpulseError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ChatpulseError> {
        Self::new(&config.url, Duration::from_millis(config.timeout_ms))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn enrichment_error(message: String, source: impl std::error::Error + Send + Sync + 'static) -> ChatpulseError {
    ChatpulseError::Enrichment {
        message,
        source: Some(Box::new(source)),
    }
}

#[async_trait]
impl EmotionClassifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<EmotionScores, ChatpulseError> {
        let response = self
            .client
            .post(&self.url)
            .json(&AnalyzeRequest { content: text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    enrichment_error("classifier request timed out".into(), e)
                } else {
                    enrichment_error(format!("classifier request failed: {e}"), e)
                }
            })?;

        let status = response.status();
        trace!(status = %status, "classifier response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatpulseError::enrichment(format!(
                "classifier returned {status}: {body}"
            )));
        }

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| enrichment_error(format!("malformed classifier response: {e}"), e))?;

        let scores = body.sentiment.emotions;
        if scores.values().any(|score| !score.is_finite()) {
            return Err(ChatpulseError::enrichment("classifier returned non-finite score"));
        }
        debug!(categories = scores.len(), "message classified");
        Ok(scores)
    }
}
