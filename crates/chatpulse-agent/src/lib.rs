// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel session pipeline for Chatpulse.
//!
//! A [`ChannelSession`] wires the ingestion client, the message store, the
//! bounded enricher, the emote resolver, and the recompute loop that
//! publishes [`AnalyticsView`]s. [`Pipeline`] owns the current session and
//! replaces it when another channel is selected.

pub mod enrich;
pub mod pipeline;
pub mod session;
pub mod settings;
pub mod shutdown;
pub mod view;

pub use enrich::Enricher;
pub use pipeline::Pipeline;
pub use session::ChannelSession;
pub use settings::{Collaborators, ResolverFactory, SessionSettings};
pub use shutdown::install_signal_handler;
pub use view::AnalyticsView;
