// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics.

use chatpulse_core::types::ConnectionState;
use metrics::{describe_counter, describe_gauge};

/// Register all Chatpulse metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!("chatpulse_messages_total", "Chat messages appended to the store");
    describe_counter!(
        "chatpulse_frames_dropped_total",
        "Inbound chat frames dropped as malformed"
    );
    describe_counter!(
        "chatpulse_enrichment_failures_total",
        "Classifier calls that failed; the message stays unenriched"
    );
    describe_counter!(
        "chatpulse_enrichment_queued_total",
        "Messages that waited for a free classifier slot"
    );
    describe_counter!(
        "chatpulse_provider_failures_total",
        "Emote catalog fetches that failed"
    );
    describe_counter!(
        "chatpulse_connection_transitions_total",
        "Ingestion client state transitions"
    );
    describe_gauge!("chatpulse_store_len", "Events currently retained in the store");
}

/// Record an appended message and the resulting store size.
pub fn record_message(store_len: usize) {
    metrics::counter!("chatpulse_messages_total").increment(1);
    metrics::gauge!("chatpulse_store_len").set(store_len as f64);
}

pub fn record_frame_dropped() {
    metrics::counter!("chatpulse_frames_dropped_total").increment(1);
}

pub fn record_enrichment_failure() {
    metrics::counter!("chatpulse_enrichment_failures_total").increment(1);
}

pub fn record_enrichment_queued() {
    metrics::counter!("chatpulse_enrichment_queued_total").increment(1);
}

/// Record a failed catalog fetch.
pub fn record_provider_failure(provider: &str) {
    metrics::counter!("chatpulse_provider_failures_total", "provider" => provider.to_string())
        .increment(1);
}

/// Record an ingestion state transition.
pub fn record_connection_state(state: ConnectionState) {
    metrics::counter!("chatpulse_connection_transitions_total", "state" => state.to_string())
        .increment(1);
}
