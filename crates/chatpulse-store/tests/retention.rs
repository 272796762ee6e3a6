// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retention and consistency properties of the message store.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use chatpulse_core::types::{ChatEvent, EmotionScores};
use chatpulse_store::MessageStore;
use proptest::prelude::*;

fn event(id: u64, author: &str) -> ChatEvent {
    ChatEvent::new(id, author, format!("msg {id}"), "#abcdef", id)
}

proptest! {
    /// The store never exceeds capacity and always holds exactly the most recent events.
    #[test]
    fn retains_exactly_the_most_recent(
        capacity in 1usize..20,
        authors in prop::collection::vec(0usize..5, 0..120),
    ) {
        let names = ["alice", "bob", "carol", "dave", "erin"];
        let store = MessageStore::new(capacity);
        for (id, author) in authors.iter().enumerate() {
            store.append(event(id as u64, names[*author]));
            prop_assert!(store.len() <= capacity);
        }

        let total = authors.len();
        let expected: Vec<u64> = (total.saturating_sub(capacity)..total).map(|i| i as u64).collect();
        let actual: Vec<u64> = store.snapshot().iter().map(|e| e.id).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Every per-author view is a subsequence of the main snapshot, with no ghosts.
    #[test]
    fn author_index_has_no_ghost_events(
        capacity in 1usize..10,
        authors in prop::collection::vec(0usize..4, 0..80),
    ) {
        let names = ["alice", "bob", "carol", "dave"];
        let store = MessageStore::new(capacity);
        for (id, author) in authors.iter().enumerate() {
            store.append(event(id as u64, names[*author]));
        }

        let main: HashSet<u64> = store.snapshot().iter().map(|e| e.id).collect();
        let mut indexed = 0;
        for name in names {
            let mine = store.messages_for(name);
            let ids: Vec<u64> = mine.iter().map(|e| e.id).collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&ids, &sorted);
            for e in &mine {
                prop_assert_eq!(&e.author, name);
                prop_assert!(main.contains(&e.id));
            }
            indexed += mine.len();
        }
        prop_assert_eq!(indexed, main.len());
    }
}

/// Readers running concurrently with the writer only ever see whole appends.
#[test]
fn concurrent_readers_see_consistent_states() {
    let store = Arc::new(MessageStore::new(16));
    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for id in 0..2_000u64 {
                let author = if id % 2 == 0 { "even" } else { "odd" };
                store.append(event(id, author));
                if id % 3 == 0 {
                    let mut scores = EmotionScores::new();
                    scores.insert("joy".into(), 1.0);
                    store.attach_emotions(id, scores);
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..500 {
                    let snap = store.snapshot();
                    assert!(snap.len() <= 16);
                    for pair in snap.windows(2) {
                        assert_eq!(pair[1].id, pair[0].id + 1, "snapshot must be contiguous");
                    }
                    let evens = store.messages_for("even");
                    assert!(evens.iter().all(|e| e.id % 2 == 0));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    let snap = store.snapshot();
    assert_eq!(snap.len(), 16);
    assert_eq!(snap.last().unwrap().id, 1_999);
}
