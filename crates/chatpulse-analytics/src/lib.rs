// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived views recomputed from message store snapshots.
//!
//! Every function here is a pure fold over a snapshot: no hidden state, same
//! input gives the same output, and the cost is bounded by the store's
//! retention bound.

pub mod emotion;
pub mod keywords;
pub mod rate;

pub use emotion::{recompute_emotion_window, zero_fill, EmotionWindow, GO_EMOTIONS};
pub use keywords::{
    recompute_keywords, KeywordCount, KeywordPolicy, Tokenizer, WhitespaceTokenizer,
    DEFAULT_STOPWORDS,
};
pub use rate::message_rate;
