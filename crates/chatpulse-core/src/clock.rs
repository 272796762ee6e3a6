// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monotonic session clock used for `arrived_at` and window "now".

use tokio::time::Instant;

/// Milliseconds elapsed since the owning session started.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    started: Instant,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
