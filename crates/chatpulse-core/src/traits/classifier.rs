// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion classifier trait.

use async_trait::async_trait;

use crate::error::ChatpulseError;
use crate::types::EmotionScores;

/// Scores a message's text into emotion categories.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<EmotionScores, ChatpulseError>;
}
