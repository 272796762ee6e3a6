// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock emotion classifier for deterministic testing.
//!
//! Responses are popped from a FIFO queue. When the queue is empty the
//! default response is used.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::EmotionClassifier;
use chatpulse_core::types::EmotionScores;
use tokio::sync::Mutex;

type Response = Result<EmotionScores, String>;

/// A classifier returning queued or default scores.
pub struct MockClassifier {
    responses: Arc<Mutex<VecDeque<Response>>>,
    default: Response,
    delay: Option<Duration>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl MockClassifier {
    /// Classifier answering every call with `default`.
    pub fn new(default: EmotionScores) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default: Ok(default),
            delay: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Classifier answering every call with `{category: score}`.
    pub fn constant(category: &str, score: f64) -> Self {
        let mut scores = EmotionScores::new();
        scores.insert(category.to_string(), score);
        Self::new(scores)
    }

    /// Classifier that fails every call.
    pub fn failing() -> Self {
        Self {
            default: Err("mock classifier failure".to_string()),
            ..Self::new(EmotionScores::new())
        }
    }

    /// Sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues one successful response.
    pub async fn push_scores(&self, scores: EmotionScores) {
        self.responses.lock().await.push_back(Ok(scores));
    }

    /// Queues one failure.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// Texts passed to `classify`, in call order.
    pub async fn seen(&self) -> Vec<String> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl EmotionClassifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<EmotionScores, ChatpulseError> {
        self.seen.lock().await.push(text.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let response = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        response.map_err(ChatpulseError::enrichment)
    }
}
