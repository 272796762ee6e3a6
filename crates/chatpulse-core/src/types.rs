// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the ingestion, store, and analytics crates.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Emotion category name to intensity score for one message.
///
/// Ordered so aggregates and JSON output are deterministic.
pub type EmotionScores = BTreeMap<String, f64>;

/// Identifier assigned to a chat event at creation, increasing within a session.
pub type EventId = u64;

/// A single chat message received from the upstream channel.
///
/// Immutable once created. `emotions` is `None` until enrichment succeeds,
/// and stays `None` forever if it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub id: EventId,
    pub author: String,
    pub text: String,
    /// Display color, stable per author for the session.
    pub color: String,
    /// Milliseconds since session start on a monotonic clock.
    pub arrived_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotions: Option<EmotionScores>,
}

impl ChatEvent {
    /// Creates an unenriched event.
    pub fn new(
        id: EventId,
        author: impl Into<String>,
        text: impl Into<String>,
        color: impl Into<String>,
        arrived_at: u64,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            text: text.into(),
            color: color.into(),
            arrived_at,
            emotions: None,
        }
    }

    /// Returns a copy carrying the given emotion vector.
    pub fn with_emotions(mut self, emotions: EmotionScores) -> Self {
        self.emotions = Some(emotions);
        self
    }
}

/// Connection states of the stream ingestion client.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Authenticating,
    Joined,
}

/// Bearer credential and identity used to authenticate against the chat channel.
///
/// Supplied by the external auth collaborator; never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelCredentials {
    pub nick: String,
    pub token: String,
}

impl ChannelCredentials {
    pub fn new(nick: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for ChannelCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelCredentials")
            .field("nick", &self.nick)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
