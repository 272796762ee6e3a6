// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Holds the current channel session and swaps it on channel selection.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chatpulse_core::error::ChatpulseError;
use chatpulse_irc::parser::normalize_channel;
use tokio::sync::Mutex;
use tracing::info;

use crate::session::ChannelSession;
use crate::settings::{Collaborators, SessionSettings};

/// Entry point for the navigation collaborator.
///
/// Readers load the current session lock-free; selections are serialized.
pub struct Pipeline {
    settings: SessionSettings,
    collab: Collaborators,
    current: ArcSwapOption<ChannelSession>,
    switching: Mutex<()>,
}

impl Pipeline {
    pub fn new(settings: SessionSettings, collab: Collaborators) -> Self {
        Self {
            settings,
            collab,
            current: ArcSwapOption::empty(),
            switching: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// The active session, if a channel has been selected.
    pub fn current(&self) -> Option<Arc<ChannelSession>> {
        self.current.load_full()
    }

    /// Tears down the active session and starts a fresh one for `channel`.
    ///
    /// An empty channel name is rejected before anything is torn down.
    pub async fn select_channel(&self, channel: &str) -> Result<Arc<ChannelSession>, ChatpulseError> {
        if normalize_channel(channel).is_empty() {
            return Err(ChatpulseError::Config("channel name cannot be empty".into()));
        }

        let _guard = self.switching.lock().await;
        if let Some(previous) = self.current.swap(None) {
            info!(from = %previous.channel(), to = %channel, "switching channel");
            previous.shutdown().await;
        }

        let session = Arc::new(ChannelSession::start(channel, &self.settings, &self.collab)?);
        self.current.store(Some(Arc::clone(&session)));
        Ok(session)
    }

    /// Shuts down the active session, if any.
    pub async fn shutdown(&self) {
        let _guard = self.switching.lock().await;
        if let Some(session) = self.current.swap(None) {
            session.shutdown().await;
        }
    }
}
