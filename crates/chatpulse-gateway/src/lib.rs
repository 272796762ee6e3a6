// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only HTTP gateway for the Chatpulse pipeline.
//!
//! Exposes the live message store, the emotion window, the keyword ranking,
//! the message rate, and the resolved emote map of the current channel
//! session. Nothing here mutates pipeline state.

pub mod handlers;
pub mod server;

pub use server::{router, start_server, GatewayState, HealthState, MetricsRender, ServerConfig};
