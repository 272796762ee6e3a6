// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emote resolution for the Chatpulse pipeline.
//!
//! Four catalogs are queried concurrently for a channel and merged into one
//! [`EmoteMap`](chatpulse_core::EmoteMap) by fixed precedence: platform
//! global, then platform channel, then BetterTTV, then 7TV (highest). A
//! failing catalog contributes an empty list and never fails resolution.

pub mod catalogs;
pub mod helix;
pub mod http;
pub mod resolver;

pub use catalogs::{BttvCatalog, SevenTvCatalog, TwitchChannelCatalog, TwitchGlobalCatalog};
pub use helix::HelixClient;
pub use http::{build_client, HelixAuth};
pub use resolver::{CatalogScope, EmoteResolver};
