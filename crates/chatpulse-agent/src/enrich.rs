// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded background enrichment of stored events.

use std::sync::{Arc, Weak};

use chatpulse_core::traits::{EmotionClassifier, ObservabilityAdapter, PipelineEvent};
use chatpulse_core::types::EventId;
use chatpulse_store::MessageStore;
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, warn};

/// Spawns one classification task per event, at most `max_in_flight` at once.
///
/// Holds only a weak reference to the store, so a task finishing after the
/// session is torn down writes nothing.
pub struct Enricher {
    classifier: Arc<dyn EmotionClassifier>,
    permits: Arc<Semaphore>,
    store: Weak<MessageStore>,
    changed: Arc<Notify>,
    observer: Arc<dyn ObservabilityAdapter>,
}

impl Enricher {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        max_in_flight: usize,
        store: &Arc<MessageStore>,
        changed: Arc<Notify>,
        observer: Arc<dyn ObservabilityAdapter>,
    ) -> Self {
        Self {
            classifier,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
            store: Arc::downgrade(store),
            changed,
            observer,
        }
    }

    /// Classifies `text` in the background and attaches the result to `id`.
    ///
    /// Never blocks the caller. When every permit is taken the task waits for
    /// one inside the spawned future.
    pub fn spawn(&self, id: EventId, text: String) {
        let ready = Arc::clone(&self.permits).try_acquire_owned().ok();
        if ready.is_none() {
            debug!(id, "classifier saturated; queueing event");
            self.observer.record(PipelineEvent::EnrichmentQueued);
        }

        let permits = Arc::clone(&self.permits);
        let classifier = Arc::clone(&self.classifier);
        let store = self.store.clone();
        let changed = Arc::clone(&self.changed);
        let observer = Arc::clone(&self.observer);
        tokio::spawn(async move {
            let _permit = match ready {
                Some(permit) => permit,
                None => match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                },
            };
            if store.strong_count() == 0 {
                return;
            }
            match classifier.classify(&text).await {
                Ok(scores) => {
                    let Some(store) = store.upgrade() else {
                        return;
                    };
                    if store.attach_emotions(id, scores) {
                        changed.notify_one();
                    }
                }
                Err(e) => {
                    warn!(id, error = %e, "enrichment failed");
                    observer.record(PipelineEvent::EnrichmentFailed {
                        message: e.to_string(),
                    });
                }
            }
        });
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chatpulse_core::types::ChatEvent;
    use chatpulse_test_utils::{CapturingObserver, MockClassifier};

    fn store_with(ids: &[EventId]) -> Arc<MessageStore> {
        let store = Arc::new(MessageStore::new(10));
        for &id in ids {
            store.append(ChatEvent::new(id, "a", "hype", "#fff", id));
        }
        store
    }

    #[tokio::test]
    async fn success_attaches_and_notifies() {
        let store = store_with(&[1]);
        let changed = Arc::new(Notify::new());
        let enricher = Enricher::new(
            Arc::new(MockClassifier::constant("joy", 0.8)),
            4,
            &store,
            Arc::clone(&changed),
            Arc::new(CapturingObserver::new()),
        );

        enricher.spawn(1, "hype".into());
        tokio::time::timeout(Duration::from_secs(2), changed.notified())
            .await
            .unwrap();
        let event = store.get(1).unwrap();
        assert_eq!(event.emotions.unwrap().get("joy"), Some(&0.8));
    }

    #[tokio::test]
    async fn failure_leaves_event_unenriched() {
        let store = store_with(&[1]);
        let observer = Arc::new(CapturingObserver::new());
        let enricher = Enricher::new(
            Arc::new(MockClassifier::failing()),
            4,
            &store,
            Arc::new(Notify::new()),
            observer.clone(),
        );

        enricher.spawn(1, "hype".into());
        for _ in 0..100 {
            if observer.count(|e| matches!(e, PipelineEvent::EnrichmentFailed { .. })) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(
            observer.count(|e| matches!(e, PipelineEvent::EnrichmentFailed { .. })),
            1
        );
        assert!(store.get(1).unwrap().emotions.is_none());
    }

    #[tokio::test]
    async fn saturated_event_is_enriched_once_a_permit_frees() {
        let store = store_with(&[1, 2]);
        let observer = Arc::new(CapturingObserver::new());
        let enricher = Enricher::new(
            Arc::new(MockClassifier::constant("joy", 1.0).with_delay(Duration::from_millis(20))),
            1,
            &store,
            Arc::new(Notify::new()),
            observer.clone(),
        );

        enricher.spawn(1, "a".into());
        enricher.spawn(2, "b".into());
        assert_eq!(enricher.available(), 0);
        assert_eq!(observer.events(), vec![PipelineEvent::EnrichmentQueued]);

        for _ in 0..100 {
            if store.get(2).and_then(|e| e.emotions.clone()).is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(store.get(1).unwrap().emotions.unwrap().get("joy"), Some(&1.0));
        assert_eq!(store.get(2).unwrap().emotions.unwrap().get("joy"), Some(&1.0));
        assert_eq!(enricher.available(), 1);
    }

    #[tokio::test]
    async fn queued_event_is_dropped_with_the_store() {
        let store = store_with(&[1, 2]);
        let classifier =
            Arc::new(MockClassifier::constant("joy", 1.0).with_delay(Duration::from_millis(30)));
        let enricher = Enricher::new(
            classifier.clone(),
            1,
            &store,
            Arc::new(Notify::new()),
            Arc::new(CapturingObserver::new()),
        );
        enricher.spawn(1, "a".into());
        enricher.spawn(2, "b".into());
        drop(store);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(classifier.seen().await, vec!["a".to_string()]);
        assert_eq!(enricher.available(), 1);
    }

    #[tokio::test]
    async fn result_after_store_dropped_is_discarded() {
        let store = store_with(&[1]);
        let enricher = Enricher::new(
            Arc::new(MockClassifier::constant("joy", 1.0).with_delay(Duration::from_millis(50))),
            1,
            &store,
            Arc::new(Notify::new()),
            Arc::new(CapturingObserver::new()),
        );
        enricher.spawn(1, "a".into());
        drop(store);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(enricher.available(), 1);
    }
}
