// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process websocket IRC endpoint.
//!
//! Accepts a single client, records every line it sends, and pushes scripted
//! payloads back. Payloads queued before the client connects are delivered
//! right after the handshake.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

enum Action {
    Send(String),
    Close,
}

pub struct MockIrcServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
    actions: mpsc::UnboundedSender<Action>,
    handle: JoinHandle<()>,
}

impl MockIrcServer {
    /// Binds an ephemeral localhost port and starts accepting.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let (actions, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(serve_one(listener, Arc::clone(&received), rx));
        Ok(Self {
            addr,
            received,
            actions,
            handle,
        })
    }

    /// `ws://` URL of the endpoint.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Queues one websocket text message (may hold several CRLF lines).
    pub fn send(&self, payload: impl Into<String>) {
        let _ = self.actions.send(Action::Send(payload.into()));
    }

    /// Queues a `PRIVMSG` from `author` in `channel`.
    pub fn send_privmsg(&self, author: &str, channel: &str, text: &str) {
        self.send(format!(
            ":{author}!{author}@{author}.tmi.twitch.tv PRIVMSG #{channel} :{text}\r\n"
        ));
    }

    /// Closes the connection with a close frame.
    pub fn close(&self) {
        let _ = self.actions.send(Action::Close);
    }

    /// Lines received from the client so far.
    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }

    /// Polls until a received line starts with `prefix`, or `timeout` passes.
    pub async fn wait_for_line(&self, prefix: &str, timeout: Duration) -> Option<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(line) = self
                .received
                .lock()
                .await
                .iter()
                .find(|l| l.starts_with(prefix))
            {
                return Some(line.clone());
            }
            if tokio::time::Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for MockIrcServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_one(
    listener: TcpListener,
    received: Arc<Mutex<Vec<String>>>,
    mut actions: mpsc::UnboundedReceiver<Action>,
) {
    let Ok((stream, peer)) = listener.accept().await else {
        return;
    };
    let Ok(ws) = accept_async(stream).await else {
        return;
    };
    debug!(%peer, "mock irc client connected");
    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let mut lines = received.lock().await;
                    lines.extend(
                        text.as_str()
                            .split("\r\n")
                            .filter(|l| !l.is_empty())
                            .map(str::to_string),
                    );
                }
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
            action = actions.recv() => match action {
                Some(Action::Send(payload)) => {
                    if write.send(Message::text(payload)).await.is_err() {
                        break;
                    }
                }
                Some(Action::Close) | None => {
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
            },
        }
    }
}
