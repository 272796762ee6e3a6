// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the pipeline and its external collaborators.
//!
//! Network-facing components sit behind `#[async_trait]` traits so the
//! pipeline can be driven by mocks in tests.

pub mod catalog;
pub mod classifier;
pub mod observability;

pub use catalog::EmoteCatalog;
pub use classifier::EmotionClassifier;
pub use observability::{NoopObserver, ObservabilityAdapter, PipelineEvent};
