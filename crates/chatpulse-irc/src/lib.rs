// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stream ingestion client for the Chatpulse pipeline.
//!
//! Connects to the chat service's websocket IRC endpoint, performs the
//! `PASS`/`NICK`/`JOIN` handshake, answers keepalives, and turns `PRIVMSG`
//! lines into [`ChatEvent`](chatpulse_core::ChatEvent)s on an mpsc channel.

pub mod client;
pub mod parser;

pub use client::{IrcClient, SessionEnd};
pub use parser::{parse_line, split_lines, Frame, ParsedPrivmsg};
