// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enrichment service client for Chatpulse.
//!
//! Implements [`EmotionClassifier`](chatpulse_core::traits::EmotionClassifier)
//! against an HTTP analysis service returning GoEmotions-style scores.

pub mod client;

pub use client::HttpClassifier;
