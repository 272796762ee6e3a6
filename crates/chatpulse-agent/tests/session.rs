// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel sessions driven by an in-process chat endpoint, mock classifier,
//! and mock catalogs.

use std::sync::Arc;
use std::time::Duration;

use chatpulse_agent::{AnalyticsView, ChannelSession, Collaborators, Pipeline, SessionSettings};
use chatpulse_core::traits::PipelineEvent;
use chatpulse_core::types::{ChannelCredentials, ConnectionState};
use chatpulse_emotes::{CatalogScope, EmoteResolver};
use chatpulse_irc::SessionEnd;
use chatpulse_test_utils::{CapturingObserver, MockCatalog, MockClassifier, MockIrcServer};

const WAIT: Duration = Duration::from_secs(5);

fn collaborators(server: &MockIrcServer, observer: Arc<CapturingObserver>) -> Collaborators {
    Collaborators::new(server.url(), ChannelCredentials::new("viewer", "secret"))
        .with_observer(observer)
}

fn settings() -> SessionSettings {
    SessionSettings {
        capacity: 3,
        refresh_interval: Duration::from_millis(50),
        ..SessionSettings::default()
    }
}

/// Polls the published views until `pred` holds.
async fn wait_for_view(
    session: &ChannelSession,
    pred: impl Fn(&AnalyticsView) -> bool,
) -> Arc<AnalyticsView> {
    let mut views = session.subscribe();
    tokio::time::timeout(WAIT, async {
        loop {
            let view = Arc::clone(&views.borrow_and_update());
            if pred(&view) {
                return view;
            }
            if views.changed().await.is_err() {
                panic!("view publisher stopped");
            }
        }
    })
    .await
    .expect("view condition not reached")
}

#[tokio::test]
async fn messages_flow_into_store_and_views() {
    let server = MockIrcServer::start().await.unwrap();
    let observer = Arc::new(CapturingObserver::new());
    let classifier = Arc::new(MockClassifier::constant("joy", 0.5));
    let collab = collaborators(&server, observer.clone()).with_classifier(classifier.clone());

    server.send_privmsg("alice", "streamer", "hype hype");
    server.send_privmsg("bob", "streamer", "hype train");
    let session = ChannelSession::start("#Streamer", &settings(), &collab).unwrap();
    assert_eq!(session.channel(), "streamer");

    let view = wait_for_view(&session, |v| {
        v.messages.len() == 2 && v.messages.iter().all(|m| m.emotions.is_some())
    })
    .await;
    assert_eq!(view.state, ConnectionState::Joined);
    assert_eq!(view.keywords[0].token, "hype");
    assert_eq!(view.keywords[0].count, 3);
    assert_eq!(view.emotions.get("joy"), Some(&1.0));
    assert_eq!(session.messages_for("alice").len(), 1);
    assert_eq!(classifier.seen().await.len(), 2);
    assert_eq!(
        observer.count(|e| matches!(e, PipelineEvent::MessageStored { .. })),
        2
    );

    session.shutdown().await;
}

#[tokio::test]
async fn store_keeps_only_the_newest_events() {
    let server = MockIrcServer::start().await.unwrap();
    let collab = collaborators(&server, Arc::new(CapturingObserver::new()));
    for i in 0..5 {
        server.send_privmsg("alice", "streamer", &format!("msg{i}"));
    }
    let session = ChannelSession::start("streamer", &settings(), &collab).unwrap();

    let view = wait_for_view(&session, |v| v.total_messages == 5).await;
    let texts: Vec<_> = view.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["msg2", "msg3", "msg4"]);
    assert_eq!(session.messages_for("alice").len(), 3);

    session.shutdown().await;
}

#[tokio::test]
async fn failed_enrichment_leaves_events_unenriched() {
    let server = MockIrcServer::start().await.unwrap();
    let observer = Arc::new(CapturingObserver::new());
    let collab = collaborators(&server, observer.clone())
        .with_classifier(Arc::new(MockClassifier::failing()));

    server.send_privmsg("alice", "streamer", "hello");
    let session = ChannelSession::start("streamer", &settings(), &collab).unwrap();

    tokio::time::timeout(WAIT, async {
        while observer.count(|e| matches!(e, PipelineEvent::EnrichmentFailed { .. })) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    let stored = session.store().snapshot();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].emotions.is_none());
    assert!(session.view().emotions.is_empty());

    session.shutdown().await;
}

#[tokio::test]
async fn emotes_resolve_in_the_background() {
    let server = MockIrcServer::start().await.unwrap();
    let collab = collaborators(&server, Arc::new(CapturingObserver::new())).with_resolver(
        Arc::new(|| {
            EmoteResolver::new(Duration::from_secs(1)).with_catalog(
                Arc::new(MockCatalog::with_pairs("global", &[("Kappa", "kappa.png")])),
                CatalogScope::Global,
            )
        }),
    );

    let session = ChannelSession::start("streamer", &settings(), &collab).unwrap();
    tokio::time::timeout(WAIT, async {
        while session.emotes().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(session.emotes().lookup("Kappa"), Some("kappa.png"));

    session.shutdown().await;
}

#[tokio::test]
async fn remote_close_ends_ingestion_but_keeps_views() {
    let server = MockIrcServer::start().await.unwrap();
    let collab = collaborators(&server, Arc::new(CapturingObserver::new()));
    server.send_privmsg("alice", "streamer", "bye");

    let session = ChannelSession::start("streamer", &settings(), &collab).unwrap();
    server.wait_for_line("JOIN", WAIT).await.unwrap();
    wait_for_view(&session, |v| v.total_messages == 1).await;
    server.close();

    let end = tokio::time::timeout(WAIT, session.join_ingestion())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(end, SessionEnd::RemoteClosed);
    let view = wait_for_view(&session, |v| v.state == ConnectionState::Disconnected).await;
    assert_eq!(view.messages.len(), 1);

    session.shutdown().await;
}

#[tokio::test]
async fn shutdown_closes_store_against_late_writes() {
    let server = MockIrcServer::start().await.unwrap();
    let classifier =
        Arc::new(MockClassifier::constant("joy", 1.0).with_delay(Duration::from_millis(200)));
    let collab = collaborators(&server, Arc::new(CapturingObserver::new()))
        .with_classifier(classifier);

    server.send_privmsg("alice", "streamer", "late");
    let session = ChannelSession::start("streamer", &settings(), &collab).unwrap();
    wait_for_view(&session, |v| v.total_messages == 1).await;

    session.shutdown().await;
    assert!(session.is_closed());
    assert!(session.store().is_closed());
    assert_eq!(session.state(), ConnectionState::Disconnected);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(session.store().snapshot()[0].emotions.is_none());
}

#[tokio::test]
async fn selecting_a_channel_replaces_the_session() {
    let server = MockIrcServer::start().await.unwrap();
    let collab = collaborators(&server, Arc::new(CapturingObserver::new()));
    let pipeline = Pipeline::new(settings(), collab);
    assert!(pipeline.current().is_none());

    server.send_privmsg("alice", "first", "hi");
    let first = pipeline.select_channel("first").await.unwrap();
    wait_for_view(&first, |v| v.total_messages == 1).await;

    let second = pipeline.select_channel("second").await.unwrap();
    assert!(first.is_closed());
    assert!(first.store().is_closed());
    assert_eq!(second.channel(), "second");
    assert!(second.store().is_empty());
    assert_eq!(pipeline.current().unwrap().channel(), "second");

    pipeline.shutdown().await;
    assert!(pipeline.current().is_none());
    assert!(second.is_closed());
}

#[tokio::test]
async fn empty_channel_is_rejected_without_tearing_down() {
    let server = MockIrcServer::start().await.unwrap();
    let pipeline = Pipeline::new(
        settings(),
        collaborators(&server, Arc::new(CapturingObserver::new())),
    );
    let first = pipeline.select_channel("streamer").await.unwrap();

    assert!(pipeline.select_channel("  # ").await.is_err());
    assert!(!first.is_closed());
    assert_eq!(pipeline.current().unwrap().channel(), "streamer");

    pipeline.shutdown().await;
}
