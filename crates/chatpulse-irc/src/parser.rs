// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-level parsing of the upstream IRC dialect.
//!
//! Only three shapes matter: keepalive `PING`, chat `PRIVMSG`, and everything
//! else (numerics, `JOIN` echoes, `CAP` replies) which is ignored.

use chatpulse_core::error::ChatpulseError;

const PRIVMSG_MARKER: &str = " PRIVMSG ";

/// A chat message extracted from a `PRIVMSG` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPrivmsg {
    pub author: String,
    /// Target channel, lower-case, without the leading `#`.
    pub channel: String,
    pub text: String,
}

/// Classification of one inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Keepalive; answer with `PONG` and the same argument.
    Ping(String),
    Privmsg(ParsedPrivmsg),
    Other,
}

/// Splits a websocket text payload into IRC lines.
pub fn split_lines(payload: &str) -> impl Iterator<Item = &str> {
    payload
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
}

/// Parses a single line.
///
/// Lines carrying the `PRIVMSG` marker but missing the author or text
/// delimiters are returned as [`ChatpulseError::Parse`]; callers drop them.
pub fn parse_line(line: &str) -> Result<Frame, ChatpulseError> {
    let payload = strip_tags(line);

    if payload == "PING" {
        return Ok(Frame::Ping(String::new()));
    }
    if let Some(arg) = payload.strip_prefix("PING ") {
        return Ok(Frame::Ping(arg.trim_start().to_string()));
    }

    let Some(marker) = payload.find(PRIVMSG_MARKER) else {
        return Ok(Frame::Other);
    };

    let malformed = || ChatpulseError::Parse {
        frame: line.to_string(),
    };

    let prefix = &payload[..marker];
    let author = prefix
        .strip_prefix(':')
        .unwrap_or(prefix)
        .split_once('!')
        .map(|(nick, _)| nick.trim())
        .ok_or_else(malformed)?;

    let rest = &payload[marker + PRIVMSG_MARKER.len()..];
    let (target, text) = rest.split_once(':').ok_or_else(malformed)?;
    let text = text.trim();

    if author.is_empty() || text.is_empty() {
        return Err(malformed());
    }

    Ok(Frame::Privmsg(ParsedPrivmsg {
        author: author.to_string(),
        channel: normalize_channel(target),
        text: text.to_string(),
    }))
}

/// Drops an IRCv3 `@key=value;...` tag block.
fn strip_tags(line: &str) -> &str {
    match line.strip_prefix('@') {
        Some(tagged) => tagged.split_once(' ').map_or("", |(_, rest)| rest),
        None => line,
    }
}

/// Lower-cases a channel name and removes the `#` sigil.
pub fn normalize_channel(value: &str) -> String {
    value.trim().trim_start_matches('#').to_ascii_lowercase()
}
