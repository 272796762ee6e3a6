// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics for the Chatpulse pipeline.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. Metrics are
//! rendered as Prometheus text format via [`PrometheusAdapter::render`],
//! which the gateway exposes at `/metrics`.

pub mod recording;

use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::{ObservabilityAdapter, PipelineEvent};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

pub use recording::{
    record_connection_state, record_enrichment_failure, record_enrichment_queued,
    record_frame_dropped, record_message, record_provider_failure, register_metrics,
};

/// Prometheus metrics adapter.
///
/// Installs the Prometheus recorder and exposes a handle for rendering
/// metrics in Prometheus text format.
#[derive(Clone)]
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Installs the Prometheus recorder globally.
    ///
    /// Only one recorder can be installed per process; a second call fails.
    pub fn new() -> Result<Self, ChatpulseError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            ChatpulseError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// [`ObservabilityAdapter`] that turns pipeline events into metrics.
///
/// Records through whatever recorder is installed; without one every call is
/// a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl ObservabilityAdapter for MetricsObserver {
    fn record(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::MessageStored { store_len } => record_message(store_len),
            PipelineEvent::FrameDropped { reason } => {
                debug!(reason = %reason, "frame dropped");
                record_frame_dropped();
            }
            PipelineEvent::EnrichmentFailed { .. } => record_enrichment_failure(),
            PipelineEvent::EnrichmentQueued => record_enrichment_queued(),
            PipelineEvent::ProviderFailed { provider, .. } => record_provider_failure(&provider),
            PipelineEvent::ConnectionChanged { state } => record_connection_state(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatpulse_core::types::ConnectionState;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn observer_records_into_local_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let observer = MetricsObserver;
            observer.record(PipelineEvent::MessageStored { store_len: 7 });
            observer.record(PipelineEvent::MessageStored { store_len: 8 });
            observer.record(PipelineEvent::EnrichmentQueued);
            observer.record(PipelineEvent::ProviderFailed {
                provider: "bttv".into(),
                message: "HTTP 500".into(),
            });
            observer.record(PipelineEvent::ConnectionChanged {
                state: ConnectionState::Joined,
            });
        });

        let text = handle.render();
        assert!(text.contains("chatpulse_messages_total 2"), "{text}");
        assert!(text.contains("chatpulse_store_len 8"), "{text}");
        assert!(text.contains("chatpulse_enrichment_queued_total 1"), "{text}");
        assert!(
            text.contains(r#"chatpulse_provider_failures_total{provider="bttv"} 1"#),
            "{text}"
        );
        assert!(
            text.contains(r#"chatpulse_connection_transitions_total{state="joined"} 1"#),
            "{text}"
        );
    }

    #[test]
    fn observer_without_recorder_is_noop() {
        MetricsObserver.record(PipelineEvent::FrameDropped {
            reason: "missing delimiter".into(),
        });
    }
}
