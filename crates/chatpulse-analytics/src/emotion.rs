// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sliding-window emotion aggregate.

use chatpulse_core::types::{ChatEvent, EmotionScores};

/// Category to summed score over the trailing window.
pub type EmotionWindow = EmotionScores;

/// The 28 categories emitted by the GoEmotions classifier.
pub const GO_EMOTIONS: &[&str] = &[
    "admiration",
    "amusement",
    "anger",
    "annoyance",
    "approval",
    "caring",
    "confusion",
    "curiosity",
    "desire",
    "disappointment",
    "disapproval",
    "disgust",
    "embarrassment",
    "excitement",
    "fear",
    "gratitude",
    "grief",
    "joy",
    "love",
    "nervousness",
    "optimism",
    "pride",
    "realization",
    "relief",
    "remorse",
    "sadness",
    "surprise",
    "neutral",
];

/// Sums emotion scores of events with `now - arrived_at <= window_ms`.
///
/// Unenriched events and absent categories contribute nothing; the result
/// only contains categories that appeared in the window.
pub fn recompute_emotion_window(snapshot: &[ChatEvent], now: u64, window_ms: u64) -> EmotionWindow {
    snapshot
        .iter()
        .filter(|event| now.saturating_sub(event.arrived_at) <= window_ms)
        .filter_map(|event| event.emotions.as_ref())
        .fold(EmotionWindow::new(), |mut acc, scores| {
            for (category, score) in scores {
                *acc.entry(category.clone()).or_insert(0.0) += score;
            }
            acc
        })
}

/// Adds a zero entry for every vocabulary category missing from `aggregate`.
///
/// Categories outside the vocabulary are kept.
pub fn zero_fill(aggregate: &EmotionWindow, vocabulary: &[&str]) -> EmotionWindow {
    let mut filled = aggregate.clone();
    for category in vocabulary {
        filled.entry((*category).to_string()).or_insert(0.0);
    }
    filled
}
