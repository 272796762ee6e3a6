// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Chatpulse pipeline.
//!
//! Every variant maps to one class of failure. None of them is allowed to take
//! the process down: callers degrade (drop a frame, skip enrichment, merge an
//! empty catalog) and keep going.

use thiserror::Error;

/// The primary error type used across all Chatpulse crates.
#[derive(Debug, Error)]
pub enum ChatpulseError {
    /// Configuration errors (invalid values, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection to the upstream chat channel dropped or could not be opened.
    ///
    /// Terminal for the current ingestion run; surfaced as a transition to
    /// `Disconnected`.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single inbound frame did not have the expected shape.
    #[error("malformed frame: {frame}")]
    Parse { frame: String },

    /// The emotion classifier was unreachable or answered with garbage.
    #[error("enrichment error: {message}")]
    Enrichment {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// One emote catalog provider failed.
    #[error("provider {provider} failed: {message}")]
    Provider {
        provider: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatpulseError {
    /// Shorthand for a transport error wrapping an underlying cause.
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a provider error without an underlying cause.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for an enrichment error without an underlying cause.
    pub fn enrichment(message: impl Into<String>) -> Self {
        Self::Enrichment {
            message: message.into(),
            source: None,
        }
    }
}
