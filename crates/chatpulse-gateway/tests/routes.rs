// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway routes over a live channel session.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chatpulse_agent::{Collaborators, Pipeline, SessionSettings};
use chatpulse_core::types::ChannelCredentials;
use chatpulse_emotes::{CatalogScope, EmoteResolver};
use chatpulse_gateway::{router, GatewayState, MetricsRender};
use chatpulse_test_utils::{MockCatalog, MockClassifier, MockIrcServer};
use serde_json::Value;
use tower::ServiceExt;

const WAIT: Duration = Duration::from_secs(5);

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn pipeline(server: &MockIrcServer) -> Arc<Pipeline> {
    let collab = Collaborators::new(server.url(), ChannelCredentials::new("viewer", "secret"))
        .with_classifier(Arc::new(MockClassifier::constant("joy", 0.25)))
        .with_resolver(Arc::new(|| {
            EmoteResolver::new(Duration::from_secs(1)).with_catalog(
                Arc::new(MockCatalog::with_pairs("global", &[("Kappa", "kappa.png")])),
                CatalogScope::Global,
            )
        }));
    let settings = SessionSettings {
        refresh_interval: Duration::from_millis(20),
        ..SessionSettings::default()
    };
    Arc::new(Pipeline::new(settings, collab))
}

/// Polls `uri` until `pred` accepts the body.
async fn wait_for(app: &Router, uri: &str, pred: impl Fn(&Value) -> bool) -> Value {
    tokio::time::timeout(WAIT, async {
        loop {
            let (status, body) = get(app, uri).await;
            if status == StatusCode::OK && pred(&body) {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("route never reached expected state")
}

#[tokio::test]
async fn routes_answer_404_before_a_channel_is_selected() {
    let server = MockIrcServer::start().await.unwrap();
    let app = router(GatewayState::new(pipeline(&server), None));

    for uri in ["/v1/messages", "/v1/emotions", "/v1/keywords", "/v1/state"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "no channel selected");
    }

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["channel"].is_null());

    let (status, _) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn views_of_the_selected_channel() {
    let server = MockIrcServer::start().await.unwrap();
    let pipeline = pipeline(&server);
    let app = router(GatewayState::new(Arc::clone(&pipeline), None));

    server.send_privmsg("alice", "streamer", "pog Kappa");
    server.send_privmsg("bob", "streamer", "pog pog");
    pipeline.select_channel("streamer").await.unwrap();

    let messages = wait_for(&app, "/v1/messages", |b| {
        b["messages"].as_array().is_some_and(|m| m.len() == 2)
    })
    .await;
    assert_eq!(messages["channel"], "streamer");
    assert_eq!(messages["messages"][0]["author"], "alice");

    let alice = wait_for(&app, "/v1/messages/alice", |b| {
        b["messages"][0]["segments"][1]["kind"] == "emote"
    })
    .await;
    assert_eq!(alice["messages"].as_array().unwrap().len(), 1);
    assert_eq!(alice["messages"][0]["segments"][1]["image"], "kappa.png");

    let keywords = wait_for(&app, "/v1/keywords", |b| b["keywords"][0]["count"] == 3).await;
    assert_eq!(keywords["keywords"][0]["token"], "pog");
    assert_eq!(keywords["top_k"], 25);

    let emotions = wait_for(&app, "/v1/emotions", |b| b["emotions"]["joy"] == 0.5).await;
    assert_eq!(emotions["emotions"]["anger"], 0.0);
    assert_eq!(emotions["window_ms"], 60_000);

    let rate = wait_for(&app, "/v1/rate", |b| {
        b["buckets"]
            .as_array()
            .is_some_and(|buckets| buckets.iter().filter_map(Value::as_u64).sum::<u64>() == 2)
    })
    .await;
    assert_eq!(rate["buckets"].as_array().unwrap().len(), 60);

    let emotes = wait_for(&app, "/v1/emotes", |b| b["count"] == 1).await;
    assert_eq!(emotes["emotes"]["Kappa"], "kappa.png");

    let (status, state) = get(&app, "/v1/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["state"], "joined");
    assert_eq!(state["total_messages"], 2);

    let (_, health) = get(&app, "/health").await;
    assert_eq!(health["channel"], "streamer");

    pipeline.shutdown().await;
}

#[tokio::test]
async fn metrics_route_uses_render_function() {
    let server = MockIrcServer::start().await.unwrap();
    let render: MetricsRender = Arc::new(|| "chatpulse_messages_total 3\n".to_string());
    let app = router(GatewayState::new(pipeline(&server), Some(render)));

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"chatpulse_messages_total 3\n");
}
