// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observability adapter receiving recovered failures and pipeline counters.

use crate::types::ConnectionState;

/// Something worth counting that happened inside the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// An event was appended to the message store.
    MessageStored { store_len: usize },
    /// A frame looked like a chat message but could not be parsed.
    FrameDropped { reason: String },
    /// A classification call failed; the event stays unenriched.
    EnrichmentFailed { message: String },
    /// Every classifier slot was busy; the event waits for one to free up.
    EnrichmentQueued,
    /// One emote catalog failed and contributed nothing.
    ProviderFailed { provider: String, message: String },
    /// The ingestion client changed state.
    ConnectionChanged { state: ConnectionState },
}

/// Sink for [`PipelineEvent`]s.
///
/// Recording must be cheap and must never fail; it is called on the hot path.
pub trait ObservabilityAdapter: Send + Sync {
    fn record(&self, event: PipelineEvent);
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ObservabilityAdapter for NoopObserver {
    fn record(&self, _event: PipelineEvent) {}
}
