// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Chatpulse live chat analytics pipeline.
//!
//! This crate provides the data model, the error taxonomy, and the traits at
//! every seam where the pipeline talks to an external service (emote catalogs,
//! the emotion classifier, the observability sink).

pub mod clock;
pub mod color;
pub mod emote;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::SessionClock;
pub use color::ColorAssigner;
pub use emote::{Emote, EmoteMap, Segment};
pub use error::ChatpulseError;
pub use types::{ChannelCredentials, ChatEvent, ConnectionState, EmotionScores, EventId};

pub use traits::{
    EmoteCatalog, EmotionClassifier, NoopObserver, ObservabilityAdapter, PipelineEvent,
};
