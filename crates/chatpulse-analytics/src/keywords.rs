// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword frequency ranking over the retained messages.
//!
//! Counts cover the whole snapshot handed in, so the ranking is bounded by
//! the store's retention bound rather than by a time window.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chatpulse_core::types::ChatEvent;
use serde::Serialize;

/// Stopwords used when none are configured.
pub const DEFAULT_STOPWORDS: &[&str] = &["the", "and", "is", "in", "to"];

/// Splits message text into comparable tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// Whitespace split followed by lower-casing.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }
}

/// Injected tokenizer and stopword set.
#[derive(Clone)]
pub struct KeywordPolicy {
    stopwords: HashSet<String>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl fmt::Debug for KeywordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordPolicy")
            .field("stopwords", &self.stopwords)
            .finish_non_exhaustive()
    }
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().copied())
    }
}

impl KeywordPolicy {
    /// Whitespace tokenizer with the given stopwords (matched lower-case).
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            tokenizer: Arc::new(WhitespaceTokenizer),
        }
    }

    /// Replaces the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Arc::new(tokenizer);
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    fn tokens<'a>(&'a self, text: &str) -> impl Iterator<Item = String> + 'a {
        self.tokenizer
            .tokenize(text)
            .into_iter()
            .filter(move |token| !token.is_empty() && !self.is_stopword(token))
    }
}

/// One ranked keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub token: String,
    pub count: usize,
}

/// Ranks the `top_k` most frequent non-stopword tokens in `snapshot`.
///
/// Sorted by count descending; ties keep the order in which the tokens first
/// appeared in the snapshot.
pub fn recompute_keywords(
    snapshot: &[ChatEvent],
    policy: &KeywordPolicy,
    top_k: usize,
) -> Vec<KeywordCount> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<KeywordCount> = Vec::new();

    for event in snapshot {
        for token in policy.tokens(&event.text) {
            match positions.get(&token) {
                Some(&idx) => counts[idx].count += 1,
                None => {
                    positions.insert(token.clone(), counts.len());
                    counts.push(KeywordCount { token, count: 1 });
                }
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_k);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(texts: &[&str]) -> Vec<ChatEvent> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ChatEvent::new(i as u64, "alice", *t, "#ffffff", i as u64))
            .collect()
    }

    fn ranked(result: &[KeywordCount]) -> Vec<(&str, usize)> {
        result.iter().map(|k| (k.token.as_str(), k.count)).collect()
    }

    #[test]
    fn ranks_by_count_with_first_seen_tie_break() {
        let snapshot = events(&["the cat sat", "the cat ran", "a dog ran"]);
        let policy = KeywordPolicy::new(["the", "a"]);
        let result = recompute_keywords(&snapshot, &policy, 3);
        assert_eq!(ranked(&result), vec![("cat", 2), ("ran", 2), ("sat", 1)]);
    }

    #[test]
    fn lowercases_before_counting_and_filtering() {
        let snapshot = events(&["The CAT", "cat The"]);
        let result = recompute_keywords(&snapshot, &KeywordPolicy::new(["the"]), 10);
        assert_eq!(ranked(&result), vec![("cat", 2)]);
    }

    #[test]
    fn default_stopwords_are_filtered() {
        let snapshot = events(&["go to the shop and in is"]);
        let result = recompute_keywords(&snapshot, &KeywordPolicy::default(), 10);
        assert_eq!(ranked(&result), vec![("go", 1), ("shop", 1)]);
    }

    #[test]
    fn top_k_truncates() {
        let snapshot = events(&["a b c d e"]);
        let result = recompute_keywords(&snapshot, &KeywordPolicy::new(Vec::<String>::new()), 2);
        assert_eq!(ranked(&result), vec![("a", 1), ("b", 1)]);
    }

    #[test]
    fn custom_tokenizer_is_used() {
        let strip_punctuation = |text: &str| -> Vec<String> {
            text.split_whitespace()
                .map(|w| {
                    w.chars()
                        .filter(|c| c.is_alphanumeric())
                        .collect::<String>()
                        .to_lowercase()
                })
                .collect()
        };
        let policy = KeywordPolicy::new(["the"]).with_tokenizer(strip_punctuation);
        let snapshot = events(&["gg!", "GG", "!!!"]);
        let result = recompute_keywords(&snapshot, &policy, 5);
        assert_eq!(ranked(&result), vec![("gg", 2)]);
    }

    #[test]
    fn empty_snapshot_ranks_nothing() {
        assert!(recompute_keywords(&[], &KeywordPolicy::default(), 5).is_empty());
    }
}
