// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic per-user display colors.
//!
//! A username is hashed together with a session seed into a hue, and the
//! saturation and brightness are drawn from the upper part of their ranges so
//! every color stays readable on a dark background.

use dashmap::DashMap;
use sha2::{Digest, Sha256};

/// Default seed used when the caller does not supply one.
pub const DEFAULT_COLOR_SEED: u64 = 0x6368_6174_7075_6c73;

const MIN_SATURATION: f64 = 0.55;
const MIN_VALUE: f64 = 0.85;

/// Memoizing username to color assigner, owned by one channel session.
#[derive(Debug)]
pub struct ColorAssigner {
    seed: u64,
    cache: DashMap<String, String>,
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_SEED)
    }
}

impl ColorAssigner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            cache: DashMap::new(),
        }
    }

    /// Returns the `#rrggbb` color for `username`.
    ///
    /// O(1) after the first lookup for a given name.
    pub fn color_for(&self, username: &str) -> String {
        if let Some(color) = self.cache.get(username) {
            return color.clone();
        }
        let color = seeded_color(self.seed, username);
        self.cache
            .entry(username.to_string())
            .or_insert(color)
            .clone()
    }

    /// Number of distinct usernames seen so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Pure hash of `(seed, username)` into a bright color.
pub fn seeded_color(seed: u64, username: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(username.as_bytes());
    let digest = hasher.finalize();

    let hue = f64::from(u16::from_le_bytes([digest[0], digest[1]]) % 360);
    let saturation = MIN_SATURATION + (1.0 - MIN_SATURATION) * f64::from(digest[2]) / 255.0;
    let value = MIN_VALUE + (1.0 - MIN_VALUE) * f64::from(digest[3]) / 255.0;

    let (r, g, b) = hsv_to_rgb(hue, saturation, value);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;
    let channel = |c: f64| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse_hex(color: &str) -> (u8, u8, u8) {
        let r = u8::from_str_radix(&color[1..3], 16).unwrap();
        let g = u8::from_str_radix(&color[3..5], 16).unwrap();
        let b = u8::from_str_radix(&color[5..7], 16).unwrap();
        (r, g, b)
    }

    #[test]
    fn same_username_same_color() {
        let colors = ColorAssigner::default();
        let first = colors.color_for("alice");
        for _ in 0..10 {
            assert_eq!(colors.color_for("alice"), first);
        }
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn color_is_stable_across_sessions_with_same_seed() {
        let a = ColorAssigner::new(42);
        let b = ColorAssigner::new(42);
        assert_eq!(a.color_for("bob"), b.color_for("bob"));
    }

    #[test]
    fn different_seed_changes_palette() {
        let names = ["alice", "bob", "carol", "dave", "erin"];
        let a: Vec<_> = names.iter().map(|n| seeded_color(1, n)).collect();
        let b: Vec<_> = names.iter().map(|n| seeded_color(2, n)).collect();
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn colors_are_bright_hex(name in "[a-zA-Z0-9_]{1,25}", seed in any::<u64>()) {
            let color = seeded_color(seed, &name);
            prop_assert_eq!(color.len(), 7);
            prop_assert!(color.starts_with('#'));
            let (r, g, b) = parse_hex(&color);
            let max = r.max(g).max(b);
            prop_assert!(f64::from(max) >= MIN_VALUE * 255.0 - 1.0);
        }
    }
}
