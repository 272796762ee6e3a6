// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Published snapshot of every derived view.

use chatpulse_analytics::{
    message_rate, recompute_emotion_window, recompute_keywords, EmotionWindow, KeywordCount,
    KeywordPolicy,
};
use chatpulse_core::types::{ChatEvent, ConnectionState};
use serde::Serialize;

use crate::settings::SessionSettings;

/// Derived views computed together from one store snapshot.
///
/// May lag the store by one append under load; never mixes two snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsView {
    pub channel: String,
    pub state: ConnectionState,
    /// Session clock reading the views were computed at.
    pub computed_at: u64,
    /// Events appended over the session, evicted ones included.
    pub total_messages: u64,
    pub messages: Vec<ChatEvent>,
    pub emotions: EmotionWindow,
    pub keywords: Vec<KeywordCount>,
    pub rate: Vec<u32>,
}

impl AnalyticsView {
    /// View of a session that has not received anything yet.
    pub fn empty(channel: &str, state: ConnectionState) -> Self {
        Self {
            channel: channel.to_string(),
            state,
            computed_at: 0,
            total_messages: 0,
            messages: Vec::new(),
            emotions: EmotionWindow::new(),
            keywords: Vec::new(),
            rate: Vec::new(),
        }
    }

    /// Folds `snapshot` into every view.
    pub fn compute(
        channel: &str,
        state: ConnectionState,
        snapshot: Vec<ChatEvent>,
        total_messages: u64,
        now: u64,
        settings: &SessionSettings,
        policy: &KeywordPolicy,
    ) -> Self {
        let emotions = recompute_emotion_window(&snapshot, now, settings.emotion_window_ms);
        let keywords = recompute_keywords(&snapshot, policy, settings.keyword_top_k);
        let rate = message_rate(&snapshot, now, settings.rate_bucket_ms, settings.rate_buckets);
        Self {
            channel: channel.to_string(),
            state,
            computed_at: now,
            total_messages,
            messages: snapshot,
            emotions,
            keywords,
            rate,
        }
    }
}
