// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Chatpulse integration tests.
//!
//! Provides mock collaborators so pipeline tests run without the chat
//! service, emote providers, or the classifier.
//!
//! # Components
//!
//! - [`MockCatalog`] - Emote catalog returning a fixed list, or failing
//! - [`MockClassifier`] - Classifier with queued responses and optional delay
//! - [`CapturingObserver`] - Observability sink that records every event
//! - [`MockIrcServer`] - In-process websocket IRC endpoint

pub mod irc_server;
pub mod mock_catalog;
pub mod mock_classifier;
pub mod observer;

pub use irc_server::MockIrcServer;
pub use mock_catalog::MockCatalog;
pub use mock_classifier::MockClassifier;
pub use observer::CapturingObserver;
