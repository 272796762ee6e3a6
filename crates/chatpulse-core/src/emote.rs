// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emote token to image mapping and text substitution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One catalog entry: a case-sensitive token and the image it renders as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    pub token: String,
    pub image: String,
}

impl Emote {
    pub fn new(token: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            image: image.into(),
        }
    }
}

/// A piece of message text after emote substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    Emote { token: String, image: String },
}

/// Mapping from emote token to image reference.
///
/// Each token maps to exactly one image. Inserting an existing token replaces
/// its image, which is how provider precedence is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmoteMap {
    entries: HashMap<String, String>,
}

impl EmoteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overrides a single token.
    pub fn insert(&mut self, token: impl Into<String>, image: impl Into<String>) {
        self.entries.insert(token.into(), image.into());
    }

    /// Merges a provider's contribution on top of the current entries.
    ///
    /// Later calls win on collision.
    pub fn merge<I>(&mut self, emotes: I)
    where
        I: IntoIterator<Item = Emote>,
    {
        for emote in emotes {
            self.entries.insert(emote.token, emote.image);
        }
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Splits message text on whitespace and substitutes known emotes.
    ///
    /// A word is matched as-is first, then with surrounding punctuation
    /// stripped, so `Kappa,` still resolves to `Kappa`.
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        text.split_whitespace()
            .map(|word| {
                if let Some(image) = self.lookup(word) {
                    return Segment::Emote {
                        token: word.to_string(),
                        image: image.to_string(),
                    };
                }
                let sanitized: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
                match self.lookup(&sanitized) {
                    Some(image) if !sanitized.is_empty() => Segment::Emote {
                        token: sanitized,
                        image: image.to_string(),
                    },
                    _ => Segment::Text {
                        text: word.to_string(),
                    },
                }
            })
            .collect()
    }
}
