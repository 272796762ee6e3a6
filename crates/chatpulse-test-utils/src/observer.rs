// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observability sink that keeps everything it is given.

use std::sync::{Mutex, PoisonError};

use chatpulse_core::traits::{ObservabilityAdapter, PipelineEvent};

#[derive(Debug, Default)]
pub struct CapturingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl CapturingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in order.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| pred(e))
            .count()
    }
}

impl ObservabilityAdapter for CapturingObserver {
    fn record(&self, event: PipelineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
