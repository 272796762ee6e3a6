// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent fetch and precedence merge of emote catalogs.
//!
//! Catalogs are merged in registration order: each one overrides every
//! catalog registered before it on a token clash. The merged map is published
//! through an [`ArcSwap`], so readers never block on resolution and see the
//! empty map until the first resolution completes.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use chatpulse_config::model::{EmotesConfig, TwitchConfig};
use chatpulse_core::emote::{Emote, EmoteMap};
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::{EmoteCatalog, NoopObserver, ObservabilityAdapter, PipelineEvent};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::catalogs::{BttvCatalog, SevenTvCatalog, TwitchChannelCatalog, TwitchGlobalCatalog};
use crate::helix::HelixClient;
use crate::http::{build_client, HelixAuth};

/// Whether a catalog needs the broadcaster id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogScope {
    Global,
    Channel,
}

struct Source {
    catalog: Arc<dyn EmoteCatalog>,
    scope: CatalogScope,
}

/// Builds and caches the merged [`EmoteMap`] for one channel session.
pub struct EmoteResolver {
    sources: Vec<Source>,
    fetch_timeout: Duration,
    helix: Option<HelixClient>,
    observer: Arc<dyn ObservabilityAdapter>,
    current: ArcSwap<EmoteMap>,
}

impl EmoteResolver {
    /// Resolver with no catalogs. Each fetch is bounded by `fetch_timeout`.
    pub fn new(fetch_timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            fetch_timeout,
            helix: None,
            observer: Arc::new(NoopObserver),
            current: ArcSwap::from_pointee(EmoteMap::new()),
        }
    }

    /// Registers a catalog with higher precedence than all previous ones.
    pub fn with_catalog(mut self, catalog: Arc<dyn EmoteCatalog>, scope: CatalogScope) -> Self {
        self.sources.push(Source { catalog, scope });
        self
    }

    /// Enables [`resolve_login`](Self::resolve_login).
    pub fn with_helix(mut self, helix: HelixClient) -> Self {
        self.helix = Some(helix);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ObservabilityAdapter>) -> Self {
        self.observer = observer;
        self
    }

    /// Standard setup: platform global < platform channel < BetterTTV < 7TV.
    ///
    /// Platform catalogs and the broadcaster lookup need both
    /// `twitch.client_id` and `twitch.access_token`; without them only the
    /// community catalogs are registered, and those need a broadcaster id.
    pub fn from_config(twitch: &TwitchConfig, emotes: &EmotesConfig) -> Result<Self, ChatpulseError> {
        let client = build_client(Duration::from_secs(emotes.fetch_timeout_secs))?;
        let mut resolver = Self::new(Duration::from_secs(emotes.fetch_timeout_secs));

        match (twitch.client_id.as_deref(), twitch.access_token.as_deref()) {
            (Some(client_id), Some(token)) => {
                let auth = HelixAuth::new(client_id, token)?;
                resolver = resolver
                    .with_catalog(
                        Arc::new(TwitchGlobalCatalog::new(
                            client.clone(),
                            auth.clone(),
                            &twitch.helix_base_url,
                        )),
                        CatalogScope::Global,
                    )
                    .with_catalog(
                        Arc::new(TwitchChannelCatalog::new(
                            client.clone(),
                            auth.clone(),
                            &twitch.helix_base_url,
                        )),
                        CatalogScope::Channel,
                    )
                    .with_helix(HelixClient::new(client.clone(), auth, &twitch.helix_base_url));
            }
            _ => warn!("twitch.client_id or twitch.access_token missing; platform emotes disabled"),
        }

        Ok(resolver
            .with_catalog(
                Arc::new(BttvCatalog::new(client.clone(), &emotes.bttv_base_url)),
                CatalogScope::Channel,
            )
            .with_catalog(
                Arc::new(SevenTvCatalog::new(client, &emotes.seventv_base_url)),
                CatalogScope::Channel,
            ))
    }

    /// Catalog names in precedence order, lowest first.
    pub fn catalog_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.catalog.name()).collect()
    }

    /// The latest resolved map; empty before the first resolution.
    pub fn current(&self) -> Arc<EmoteMap> {
        self.current.load_full()
    }

    /// Looks up the broadcaster id for `login`, then resolves.
    ///
    /// A failed lookup leaves only global catalogs contributing.
    pub async fn resolve_login(&self, login: &str) -> Arc<EmoteMap> {
        let channel_id = match &self.helix {
            Some(helix) => match helix.lookup_broadcaster_id(login).await {
                Ok(Some(id)) => Some(id),
                Ok(None) => {
                    warn!(login, "broadcaster not found; channel emotes unavailable");
                    None
                }
                Err(e) => {
                    self.report_failure("helix", &e);
                    None
                }
            },
            None => None,
        };
        self.resolve(channel_id.as_deref()).await
    }

    /// Fetches every catalog concurrently and publishes the merged map.
    ///
    /// Channel-scoped catalogs are skipped when `channel_id` is `None`. A
    /// failing or slow catalog contributes nothing.
    pub async fn resolve(&self, channel_id: Option<&str>) -> Arc<EmoteMap> {
        let fetches = self.sources.iter().map(|source| self.fetch_one(source, channel_id));
        let contributions = join_all(fetches).await;

        let mut merged = EmoteMap::new();
        for emotes in contributions {
            merged.merge(emotes);
        }
        info!(
            channel_id = channel_id.unwrap_or("<none>"),
            emotes = merged.len(),
            "emote map resolved"
        );

        let merged = Arc::new(merged);
        self.current.store(Arc::clone(&merged));
        merged
    }

    async fn fetch_one(&self, source: &Source, channel_id: Option<&str>) -> Vec<Emote> {
        let name = source.catalog.name();
        let id = match (source.scope, channel_id) {
            (CatalogScope::Channel, None) => {
                debug!(provider = name, "no broadcaster id; skipping channel catalog");
                return Vec::new();
            }
            (_, id) => id.unwrap_or_default(),
        };

        match tokio::time::timeout(self.fetch_timeout, source.catalog.fetch(id)).await {
            Ok(Ok(emotes)) => {
                debug!(provider = name, count = emotes.len(), "catalog fetched");
                emotes
            }
            Ok(Err(e)) => {
                self.report_failure(name, &e);
                Vec::new()
            }
            Err(_) => {
                let e = ChatpulseError::Timeout {
                    duration: self.fetch_timeout,
                };
                self.report_failure(name, &e);
                Vec::new()
            }
        }
    }

    fn report_failure(&self, provider: &str, error: &ChatpulseError) {
        warn!(provider, error = %error, "emote provider failed; contributing nothing");
        self.observer.record(PipelineEvent::ProviderFailed {
            provider: provider.to_string(),
            message: error.to_string(),
        });
    }
}
