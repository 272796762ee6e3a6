// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-bucket message counts ending at `now`.

use chatpulse_core::types::ChatEvent;

/// Counts events into `buckets` consecutive buckets of `bucket_ms` each.
///
/// The last bucket covers `(now - bucket_ms, now]`, and the result runs
/// oldest first. Events older than the covered span are ignored.
pub fn message_rate(snapshot: &[ChatEvent], now: u64, bucket_ms: u64, buckets: usize) -> Vec<u32> {
    let mut counts = vec![0u32; buckets];
    if buckets == 0 {
        return counts;
    }
    let bucket_ms = bucket_ms.max(1);

    for event in snapshot {
        let back = now.saturating_sub(event.arrived_at) / bucket_ms;
        if let Ok(back) = usize::try_from(back) {
            if back < buckets {
                counts[buckets - 1 - back] += 1;
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(times: &[u64]) -> Vec<ChatEvent> {
        times
            .iter()
            .enumerate()
            .map(|(i, t)| ChatEvent::new(i as u64, "alice", "hi", "#ffffff", *t))
            .collect()
    }

    #[test]
    fn counts_land_in_buckets_oldest_first() {
        let snapshot = at(&[0, 500, 1_200, 2_900, 3_000]);
        assert_eq!(message_rate(&snapshot, 3_000, 1_000, 3), vec![1, 1, 2]);
    }

    #[test]
    fn events_outside_span_are_ignored() {
        let snapshot = at(&[0, 10_000]);
        assert_eq!(message_rate(&snapshot, 10_000, 1_000, 5), vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn future_events_count_as_current() {
        let snapshot = at(&[5_000]);
        assert_eq!(message_rate(&snapshot, 4_000, 1_000, 2), vec![0, 1]);
    }

    #[test]
    fn zero_buckets_is_empty() {
        assert!(message_rate(&at(&[1]), 1, 1_000, 0).is_empty());
    }
}
