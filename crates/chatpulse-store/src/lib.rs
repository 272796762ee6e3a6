// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory message store for one channel session.
//!
//! Keeps the `N` most recent [`ChatEvent`](chatpulse_core::ChatEvent)s and an
//! index of each author's retained events. Nothing is persisted; the store
//! lives exactly as long as its session.

pub mod store;

pub use store::MessageStore;
