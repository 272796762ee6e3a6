// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One channel session: ingestion, enrichment, store, and derived views.
//!
//! Everything a session owns lives exactly as long as the session. Switching
//! channels builds a new [`ChannelSession`] rather than resetting this one.

use std::sync::{Arc, Mutex, PoisonError};

use chatpulse_analytics::KeywordPolicy;
use chatpulse_core::error::ChatpulseError;
use chatpulse_core::traits::{ObservabilityAdapter, PipelineEvent};
use chatpulse_core::types::{ChatEvent, ConnectionState};
use chatpulse_core::{ColorAssigner, EmoteMap, SessionClock};
use chatpulse_emotes::EmoteResolver;
use chatpulse_irc::parser::normalize_channel;
use chatpulse_irc::{IrcClient, SessionEnd};
use chatpulse_store::MessageStore;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::enrich::Enricher;
use crate::settings::{Collaborators, SessionSettings};
use crate::view::AnalyticsView;

type IngestionHandle = JoinHandle<Result<SessionEnd, ChatpulseError>>;

/// A running channel session.
///
/// Dropping the session cancels its tasks and closes the store; call
/// [`shutdown`](Self::shutdown) to also wait for them.
pub struct ChannelSession {
    channel: String,
    client: Arc<IrcClient>,
    store: Arc<MessageStore>,
    resolver: Arc<EmoteResolver>,
    views: watch::Receiver<Arc<AnalyticsView>>,
    cancel: CancellationToken,
    ingestion: Mutex<Option<IngestionHandle>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for ChannelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSession")
            .field("channel", &self.channel)
            .field("state", &self.state())
            .field("stored", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl ChannelSession {
    /// Starts every task of a session for `channel`.
    ///
    /// Must be called from within a tokio runtime. Fails only when the
    /// channel name is empty.
    pub fn start(
        channel: &str,
        settings: &SessionSettings,
        collab: &Collaborators,
    ) -> Result<Self, ChatpulseError> {
        let channel = normalize_channel(channel);
        if channel.is_empty() {
            return Err(ChatpulseError::Config("channel name cannot be empty".into()));
        }

        let clock = SessionClock::start();
        let store = Arc::new(MessageStore::new(settings.capacity));
        let client = Arc::new(
            IrcClient::new(
                collab.irc_url.clone(),
                collab.credentials.clone(),
                Arc::new(ColorAssigner::new(settings.color_seed)),
                clock,
            )
            .with_observer(Arc::clone(&collab.observer)),
        );
        let cancel = CancellationToken::new();
        let changed = Arc::new(Notify::new());
        let (events_tx, events_rx) = mpsc::channel(settings.event_buffer.max(1));

        let ingestion = {
            let client = Arc::clone(&client);
            let channel = channel.clone();
            let cancel = cancel.child_token();
            tokio::spawn(async move { client.run(&channel, events_tx, cancel).await })
        };

        // Resolution is not cancelled; a late result lands in a resolver
        // nobody reads any more.
        let resolver = Arc::new((collab.resolver)());
        {
            let resolver = Arc::clone(&resolver);
            let channel = channel.clone();
            tokio::spawn(async move {
                resolver.resolve_login(&channel).await;
            });
        }

        let enricher = collab.classifier.as_ref().map(|classifier| {
            Enricher::new(
                Arc::clone(classifier),
                settings.max_in_flight,
                &store,
                Arc::clone(&changed),
                Arc::clone(&collab.observer),
            )
        });

        let appender = tokio::spawn(append_loop(
            events_rx,
            Arc::clone(&store),
            enricher,
            Arc::clone(&changed),
            Arc::clone(&collab.observer),
            cancel.clone(),
        ));

        let (views_tx, views) = watch::channel(Arc::new(AnalyticsView::empty(
            &channel,
            ConnectionState::Disconnected,
        )));
        let recompute = tokio::spawn(
            Recompute {
                channel: channel.clone(),
                client: Arc::clone(&client),
                store: Arc::clone(&store),
                clock,
                settings: settings.clone(),
                policy: collab.keyword_policy.clone(),
                changed,
                views: views_tx,
            }
            .run(cancel.clone()),
        );

        info!(channel = %channel, capacity = store.capacity(), "channel session started");
        Ok(Self {
            channel,
            client,
            store,
            resolver,
            views,
            cancel,
            ingestion: Mutex::new(Some(ingestion)),
            workers: Mutex::new(vec![appender, recompute]),
        })
    }

    /// Normalized channel login.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    pub fn state(&self) -> ConnectionState {
        self.client.state()
    }

    /// Watches connection state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.client.subscribe_state()
    }

    /// Latest published views.
    pub fn view(&self) -> Arc<AnalyticsView> {
        Arc::clone(&self.views.borrow())
    }

    /// Receiver notified on every recomputation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AnalyticsView>> {
        self.views.clone()
    }

    /// Emote map resolved for this channel; empty until resolution finishes.
    pub fn emotes(&self) -> Arc<EmoteMap> {
        self.resolver.current()
    }

    pub fn messages_for(&self, author: &str) -> Vec<ChatEvent> {
        self.store.messages_for(author)
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Waits for the ingestion task to end on its own (remote close,
    /// transport error, or cancellation).
    ///
    /// Returns `None` if it was already joined.
    pub async fn join_ingestion(&self) -> Option<Result<SessionEnd, ChatpulseError>> {
        let handle = self
            .ingestion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        Some(join(handle).await)
    }

    /// Cancels every task, closes the store, and waits for the tasks to end.
    ///
    /// Enrichment calls still in flight finish in the background and are
    /// discarded.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.store.close();

        let ingestion = self
            .ingestion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = ingestion {
            match join(handle).await {
                Ok(end) => debug!(channel = %self.channel, ?end, "ingestion joined"),
                Err(e) => debug!(channel = %self.channel, error = %e, "ingestion ended with error"),
            }
        }

        let workers: Vec<_> = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for worker in workers {
            if let Err(e) = worker.await {
                warn!(channel = %self.channel, error = %e, "session worker panicked");
            }
        }
        info!(channel = %self.channel, "channel session shut down");
    }
}

impl Drop for ChannelSession {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.store.close();
    }
}

async fn join(handle: IngestionHandle) -> Result<SessionEnd, ChatpulseError> {
    handle
        .await
        .map_err(|e| ChatpulseError::Internal(format!("ingestion task failed: {e}")))?
}

/// Single writer of the store.
async fn append_loop(
    mut events: mpsc::Receiver<ChatEvent>,
    store: Arc<MessageStore>,
    enricher: Option<Enricher>,
    changed: Arc<Notify>,
    observer: Arc<dyn ObservabilityAdapter>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };
        if store.is_closed() {
            break;
        }

        let id = event.id;
        let text = enricher.as_ref().map(|_| event.text.clone());
        store.append(event);
        observer.record(PipelineEvent::MessageStored {
            store_len: store.len(),
        });
        changed.notify_one();

        if let (Some(enricher), Some(text)) = (&enricher, text) {
            enricher.spawn(id, text);
        }
    }
    debug!("append loop stopped");
}

/// Recomputes every view after an append, an enrichment, or a refresh tick.
struct Recompute {
    channel: String,
    client: Arc<IrcClient>,
    store: Arc<MessageStore>,
    clock: SessionClock,
    settings: SessionSettings,
    policy: KeywordPolicy,
    changed: Arc<Notify>,
    views: watch::Sender<Arc<AnalyticsView>>,
}

impl Recompute {
    async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.settings.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut state = self.client.subscribe_state();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.changed.notified() => {}
                Ok(()) = state.changed() => {}
                _ = ticker.tick() => {}
            }
            self.publish();
        }
        debug!(channel = %self.channel, "recompute loop stopped");
    }

    fn publish(&self) {
        let view = AnalyticsView::compute(
            &self.channel,
            self.client.state(),
            self.store.snapshot(),
            self.store.total_appended(),
            self.clock.now_ms(),
            &self.settings,
            &self.policy,
        );
        self.views.send_replace(Arc::new(view));
    }
}
