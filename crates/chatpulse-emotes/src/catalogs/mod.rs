// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concrete [`EmoteCatalog`](chatpulse_core::traits::EmoteCatalog) clients.

pub mod bttv;
pub mod seventv;
pub mod twitch;

pub use bttv::BttvCatalog;
pub use seventv::SevenTvCatalog;
pub use twitch::{TwitchChannelCatalog, TwitchGlobalCatalog};
