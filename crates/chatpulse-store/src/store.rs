// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ring buffer of recent chat events plus a per-author index.
//!
//! All three structures (the ring, the per-author index and the id index) hold
//! `Arc`s to the same stored items and are updated under one write lock, so a reader sees either the whole append (including any
//! eviction) or none of it. Emotion vectors are attached through a per-item
//! `OnceLock`, which needs only the read lock and can never be observed
//! half-written.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chatpulse_core::types::{ChatEvent, EmotionScores, EventId};
use tracing::{debug, trace};

/// One retained event. `event.emotions` is always `None`; the enrichment
/// result lives in `emotions`.
#[derive(Debug)]
struct StoredEvent {
    event: ChatEvent,
    emotions: OnceLock<EmotionScores>,
}

impl StoredEvent {
    fn new(mut event: ChatEvent) -> Self {
        let emotions = OnceLock::new();
        if let Some(scores) = event.emotions.take() {
            let _ = emotions.set(scores);
        }
        Self { event, emotions }
    }

    fn materialize(&self) -> ChatEvent {
        let mut event = self.event.clone();
        event.emotions = self.emotions.get().cloned();
        event
    }
}

#[derive(Debug, Default)]
struct Inner {
    events: VecDeque<Arc<StoredEvent>>,
    by_author: HashMap<String, VecDeque<Arc<StoredEvent>>>,
    by_id: HashMap<EventId, Arc<StoredEvent>>,
}

impl Inner {
    fn find(&self, id: EventId) -> Option<&Arc<StoredEvent>> {
        self.by_id.get(&id)
    }

    fn evict_oldest(&mut self) -> Option<Arc<StoredEvent>> {
        let evicted = self.events.pop_front()?;
        if self
            .by_id
            .get(&evicted.event.id)
            .is_some_and(|indexed| Arc::ptr_eq(indexed, &evicted))
        {
            self.by_id.remove(&evicted.event.id);
        }
        let author = &evicted.event.author;
        if let Some(list) = self.by_author.get_mut(author) {
            // The globally oldest event is also that author's oldest.
            if list
                .front()
                .is_some_and(|front| Arc::ptr_eq(front, &evicted))
            {
                list.pop_front();
            }
            if list.is_empty() {
                self.by_author.remove(author);
            }
        }
        Some(evicted)
    }
}

/// Bounded store of the most recent chat events for one channel session.
///
/// Single writer: only the ingestion consumer calls [`append`](Self::append).
/// Any number of readers may call [`snapshot`](Self::snapshot) and
/// [`messages_for`](Self::messages_for) concurrently.
#[derive(Debug)]
pub struct MessageStore {
    capacity: usize,
    inner: RwLock<Inner>,
    closed: AtomicBool,
    appended: AtomicU64,
}

impl MessageStore {
    /// Creates an empty store retaining at most `capacity` events.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: RwLock::new(Inner {
                events: VecDeque::with_capacity(capacity),
                by_author: HashMap::new(),
                by_id: HashMap::with_capacity(capacity),
            }),
            closed: AtomicBool::new(false),
            appended: AtomicU64::new(0),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends an event, evicting the oldest one first when at capacity.
    ///
    /// Returns the id of the evicted event, if any. Appends to a closed store
    /// are ignored. Ids need not be ordered; if an id repeats, lookups by id
    /// resolve to the latest event carrying it.
    pub fn append(&self, event: ChatEvent) -> Option<EventId> {
        if self.is_closed() {
            debug!(id = event.id, "append to closed store ignored");
            return None;
        }

        let stored = Arc::new(StoredEvent::new(event));
        let mut inner = self.write();

        let evicted = if inner.events.len() >= self.capacity {
            inner.evict_oldest().map(|e| e.event.id)
        } else {
            None
        };

        inner
            .by_author
            .entry(stored.event.author.clone())
            .or_default()
            .push_back(Arc::clone(&stored));
        inner.by_id.insert(stored.event.id, Arc::clone(&stored));
        inner.events.push_back(stored);
        drop(inner);

        self.appended.fetch_add(1, Ordering::Relaxed);
        if let Some(id) = evicted {
            trace!(evicted = id, "evicted oldest event");
        }
        evicted
    }

    /// Attaches an emotion vector to a retained event.
    ///
    /// Returns `false` if the event was already evicted, already enriched, or
    /// the store is closed.
    pub fn attach_emotions(&self, id: EventId, emotions: EmotionScores) -> bool {
        if self.is_closed() {
            return false;
        }
        let inner = self.read();
        match inner.find(id) {
            Some(stored) => stored.emotions.set(emotions).is_ok(),
            None => {
                trace!(id, "enrichment arrived after eviction");
                false
            }
        }
    }

    /// Returns an independent copy of all retained events, oldest first.
    pub fn snapshot(&self) -> Vec<ChatEvent> {
        self.read()
            .events
            .iter()
            .map(|stored| stored.materialize())
            .collect()
    }

    /// Returns the retained events of one author, oldest first.
    pub fn messages_for(&self, author: &str) -> Vec<ChatEvent> {
        self.read()
            .by_author
            .get(author)
            .map(|list| list.iter().map(|stored| stored.materialize()).collect())
            .unwrap_or_default()
    }

    /// Returns the event with the given id if it is still retained.
    pub fn get(&self, id: EventId) -> Option<ChatEvent> {
        self.read().find(id).map(|stored| stored.materialize())
    }

    /// Authors with at least one retained event.
    pub fn authors(&self) -> Vec<String> {
        let mut authors: Vec<String> = self.read().by_author.keys().cloned().collect();
        authors.sort();
        authors
    }

    pub fn len(&self) -> usize {
        self.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of events ever appended, including evicted ones.
    pub fn total_appended(&self) -> u64 {
        self.appended.load(Ordering::Relaxed)
    }

    /// Marks the store as disposed. Later appends and enrichments are no-ops.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(retained = self.len(), "message store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: EventId, author: &str) -> ChatEvent {
        ChatEvent::new(id, author, format!("message {id}"), "#ffffff", id * 10)
    }

    fn joy(score: f64) -> EmotionScores {
        let mut scores = EmotionScores::new();
        scores.insert("joy".into(), score);
        scores
    }

    #[test]
    fn evicts_oldest_from_main_and_author_index() {
        let store = MessageStore::new(2);
        assert_eq!(store.append(event(1, "alice")), None);
        assert_eq!(store.append(event(2, "bob")), None);
        assert_eq!(store.append(event(3, "bob")), Some(1));

        let ids: Vec<_> = store.snapshot().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(store.messages_for("alice").is_empty());
        assert_eq!(store.authors(), vec!["bob".to_string()]);
        assert_eq!(store.total_appended(), 3);
    }

    #[test]
    fn snapshot_is_independent_of_later_appends() {
        let store = MessageStore::new(3);
        store.append(event(1, "alice"));
        let snap = store.snapshot();
        store.append(event(2, "alice"));
        assert!(store.attach_emotions(1, joy(1.0)));
        assert_eq!(snap.len(), 1);
        assert!(snap[0].emotions.is_none());
    }

    #[test]
    fn attach_emotions_is_visible_in_both_views() {
        let store = MessageStore::new(3);
        store.append(event(1, "alice"));
        assert!(store.attach_emotions(1, joy(0.7)));

        assert_eq!(store.snapshot()[0].emotions, Some(joy(0.7)));
        assert_eq!(store.messages_for("alice")[0].emotions, Some(joy(0.7)));
    }

    #[test]
    fn attach_emotions_is_write_once() {
        let store = MessageStore::new(3);
        store.append(event(1, "alice"));
        assert!(store.attach_emotions(1, joy(0.1)));
        assert!(!store.attach_emotions(1, joy(0.9)));
        assert_eq!(store.get(1).unwrap().emotions, Some(joy(0.1)));
    }

    #[test]
    fn attach_after_eviction_is_a_noop() {
        let store = MessageStore::new(1);
        store.append(event(1, "alice"));
        store.append(event(2, "bob"));
        assert!(!store.attach_emotions(1, joy(1.0)));
        assert!(store.get(1).is_none());
    }

    #[test]
    fn closed_store_rejects_writes() {
        let store = MessageStore::new(2);
        store.append(event(1, "alice"));
        store.close();
        assert!(store.is_closed());
        assert_eq!(store.append(event(2, "alice")), None);
        assert!(!store.attach_emotions(1, joy(1.0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn pre_enriched_event_keeps_its_emotions() {
        let store = MessageStore::new(2);
        store.append(event(1, "alice").with_emotions(joy(0.3)));
        assert_eq!(store.get(1).unwrap().emotions, Some(joy(0.3)));
        assert!(!store.attach_emotions(1, joy(0.5)));
    }

    #[test]
    fn lookup_by_id_does_not_depend_on_append_order() {
        let store = MessageStore::new(10);
        for id in [10, 1, 2, 3] {
            store.append(event(id, "alice"));
        }
        assert!(store.attach_emotions(10, joy(0.6)));
        assert_eq!(store.get(10).unwrap().emotions, Some(joy(0.6)));
        assert!(store.attach_emotions(2, joy(0.2)));
        assert_eq!(store.messages_for("alice")[2].emotions, Some(joy(0.2)));
    }

    #[test]
    fn evicting_a_repeated_id_keeps_the_newer_event_addressable() {
        let store = MessageStore::new(3);
        store.append(event(7, "alice"));
        store.append(event(8, "bob"));
        store.append(ChatEvent::new(7, "carol", "again", "#ffffff", 90));
        assert_eq!(store.append(event(9, "dave")), Some(7));
        assert_eq!(store.get(7).unwrap().author, "carol");
        assert!(store.attach_emotions(7, joy(0.4)));
        assert_eq!(store.messages_for("carol")[0].emotions, Some(joy(0.4)));
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let store = MessageStore::new(0);
        store.append(event(1, "alice"));
        store.append(event(2, "alice"));
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.len(), 1);
    }
}
