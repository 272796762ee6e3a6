// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Websocket connection to the upstream chat channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::{NoopObserver, ObservabilityAdapter, PipelineEvent};
use chatpulse_core::types::{ChannelCredentials, ChatEvent, ConnectionState};
use chatpulse_core::{ColorAssigner, SessionClock};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::parser::{normalize_channel, parse_line, split_lines, Frame};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a joined session ended without a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The cancellation token fired.
    Cancelled,
    /// The server closed the connection.
    RemoteClosed,
    /// The event receiver was dropped.
    ConsumerGone,
}

/// Stream ingestion client for one channel session.
///
/// Drives `Disconnected -> Connecting -> Authenticating -> Joined` and back to
/// `Disconnected` on close, error, or cancellation. It never reconnects on
/// its own; the caller decides whether to call [`run`](Self::run) again.
pub struct IrcClient {
    url: String,
    credentials: ChannelCredentials,
    colors: Arc<ColorAssigner>,
    clock: SessionClock,
    observer: Arc<dyn ObservabilityAdapter>,
    next_id: AtomicU64,
    state: watch::Sender<ConnectionState>,
}

impl IrcClient {
    pub fn new(
        url: impl Into<String>,
        credentials: ChannelCredentials,
        colors: Arc<ColorAssigner>,
        clock: SessionClock,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            url: url.into(),
            credentials,
            colors,
            clock,
            observer: Arc::new(NoopObserver),
            next_id: AtomicU64::new(1),
            state,
        }
    }

    /// Routes dropped frames and state changes to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn ObservabilityAdapter>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watches connection state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    fn transition(&self, next: ConnectionState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        if changed {
            debug!(state = %next, "ingestion state changed");
            self.observer
                .record(PipelineEvent::ConnectionChanged { state: next });
        }
    }

    /// Connects, authenticates, joins `channel`, and forwards parsed chat
    /// events to `tx` until the connection ends.
    ///
    /// Returns `Err(Transport)` if the connection could not be opened or
    /// failed mid-stream. The state is `Disconnected` when this returns.
    pub async fn run(
        &self,
        channel: &str,
        tx: mpsc::Sender<ChatEvent>,
        cancel: CancellationToken,
    ) -> Result<SessionEnd, ChatpulseError> {
        let result = self.run_inner(channel, &tx, &cancel).await;
        self.transition(ConnectionState::Disconnected);
        match &result {
            Ok(end) => info!(channel, ?end, "ingestion stopped"),
            Err(e) => warn!(channel, error = %e, "ingestion failed"),
        }
        result
    }

    async fn run_inner(
        &self,
        channel: &str,
        tx: &mpsc::Sender<ChatEvent>,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, ChatpulseError> {
        let channel = normalize_channel(channel);
        if channel.is_empty() {
            return Err(ChatpulseError::Config("channel name cannot be empty".into()));
        }

        self.transition(ConnectionState::Connecting);
        let mut socket = tokio::select! {
            _ = cancel.cancelled() => return Ok(SessionEnd::Cancelled),
            connected = connect_async(self.url.as_str()) => {
                let (socket, _response) = connected
                    .map_err(|e| ChatpulseError::transport("failed to connect to chat endpoint", e))?;
                socket
            }
        };

        self.transition(ConnectionState::Authenticating);
        send_line(&mut socket, &format!("PASS {}", oauth_pass(&self.credentials.token))).await?;
        send_line(&mut socket, &format!("NICK {}", self.credentials.nick)).await?;

        // The server never acknowledges JOIN, so Joined is entered on send.
        send_line(&mut socket, &format!("JOIN #{channel}")).await?;
        self.transition(ConnectionState::Joined);
        info!(channel = %channel, nick = %self.credentials.nick, "joined chat channel");

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = socket.close(None).await;
                    return Ok(SessionEnd::Cancelled);
                }
                next = socket.next() => next,
            };

            let payload = match next {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "server closed chat connection");
                    return Ok(SessionEnd::RemoteClosed);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Err(ChatpulseError::transport("chat connection failed", e));
                }
                None => return Ok(SessionEnd::RemoteClosed),
            };

            for line in split_lines(payload.as_str()) {
                match parse_line(line) {
                    Ok(Frame::Ping(arg)) => {
                        send_line(&mut socket, &format!("PONG {arg}")).await?;
                    }
                    Ok(Frame::Privmsg(msg)) => {
                        if msg.channel != channel {
                            trace!(target_channel = %msg.channel, "ignoring message for other channel");
                            continue;
                        }
                        let event = ChatEvent::new(
                            self.next_id.fetch_add(1, Ordering::Relaxed),
                            msg.author.as_str(),
                            msg.text,
                            self.colors.color_for(&msg.author),
                            self.clock.now_ms(),
                        );
                        if tx.send(event).await.is_err() {
                            warn!("event receiver dropped; stopping ingestion");
                            let _ = socket.close(None).await;
                            return Ok(SessionEnd::ConsumerGone);
                        }
                    }
                    Ok(Frame::Other) => {}
                    Err(e) => {
                        debug!(error = %e, "dropping malformed frame");
                        self.observer.record(PipelineEvent::FrameDropped {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
    }
}

fn oauth_pass(token: &str) -> String {
    if token.starts_with("oauth:") {
        token.to_string()
    } else {
        format!("oauth:{token}")
    }
}

async fn send_line(socket: &mut Socket, line: &str) -> Result<(), ChatpulseError> {
    socket
        .send(Message::text(line.to_owned()))
        .await
        .map_err(|e| ChatpulseError::transport("failed to send frame", e))
}
