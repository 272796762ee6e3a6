// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the read-only gateway.
//!
//! Every `/v1` route reads the current channel session and answers 404 when
//! no channel is selected.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chatpulse_agent::ChannelSession;
use chatpulse_analytics::{zero_fill, EmotionWindow, KeywordCount, GO_EMOTIONS};
use chatpulse_core::types::{ChatEvent, ConnectionState, EmotionScores, EventId};
use chatpulse_core::{EmoteMap, Segment};
use serde::Serialize;

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub channel: Option<String>,
}

/// One message prepared for rendering.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: EventId,
    pub author: String,
    pub color: String,
    pub arrived_at: u64,
    pub text: String,
    /// Text split into words and emote images.
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotions: Option<EmotionScores>,
}

impl MessageView {
    fn render(event: ChatEvent, emotes: &EmoteMap) -> Self {
        Self {
            segments: emotes.segments(&event.text),
            id: event.id,
            author: event.author,
            color: event.color,
            arrived_at: event.arrived_at,
            text: event.text,
            emotions: event.emotions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub channel: String,
    pub messages: Vec<MessageView>,
}

/// Response body for GET /v1/emotions. Every known category is present.
#[derive(Debug, Serialize)]
pub struct EmotionsResponse {
    pub window_ms: u64,
    pub computed_at: u64,
    pub emotions: EmotionWindow,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub top_k: usize,
    pub keywords: Vec<KeywordCount>,
}

/// Response body for GET /v1/rate; `buckets` is oldest first.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub bucket_ms: u64,
    pub buckets: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct EmotesResponse {
    pub count: usize,
    pub emotes: EmoteMap,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub channel: String,
    pub state: ConnectionState,
    pub stored: usize,
    pub total_messages: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn no_session() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "no channel selected".to_string(),
        }),
    )
        .into_response()
}

fn session(state: &GatewayState) -> Result<Arc<ChannelSession>, Response> {
    state.pipeline.current().ok_or_else(no_session)
}

fn render_messages(session: &ChannelSession, events: Vec<ChatEvent>) -> MessagesResponse {
    let emotes = session.emotes();
    MessagesResponse {
        channel: session.channel().to_string(),
        messages: events
            .into_iter()
            .map(|event| MessageView::render(event, &emotes))
            .collect(),
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        channel: state
            .pipeline
            .current()
            .map(|session| session.channel().to_string()),
    })
}

/// GET /metrics
///
/// Prometheus text format, or 404 when no recorder is installed.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

/// GET /v1/messages
///
/// Reads the store directly, so enrichment shows up before the next
/// recomputation.
pub async fn get_messages(State(state): State<GatewayState>) -> Response {
    match session(&state) {
        Ok(session) => {
            let events = session.store().snapshot();
            Json(render_messages(&session, events)).into_response()
        }
        Err(resp) => resp,
    }
}

/// GET /v1/messages/{author}
pub async fn get_author_messages(
    State(state): State<GatewayState>,
    Path(author): Path<String>,
) -> Response {
    match session(&state) {
        Ok(session) => {
            let events = session.messages_for(&author);
            Json(render_messages(&session, events)).into_response()
        }
        Err(resp) => resp,
    }
}

/// GET /v1/emotions
pub async fn get_emotions(State(state): State<GatewayState>) -> Response {
    match session(&state) {
        Ok(session) => {
            let view = session.view();
            Json(EmotionsResponse {
                window_ms: state.pipeline.settings().emotion_window_ms,
                computed_at: view.computed_at,
                emotions: zero_fill(&view.emotions, GO_EMOTIONS),
            })
            .into_response()
        }
        Err(resp) => resp,
    }
}

/// GET /v1/keywords
pub async fn get_keywords(State(state): State<GatewayState>) -> Response {
    match session(&state) {
        Ok(session) => Json(KeywordsResponse {
            top_k: state.pipeline.settings().keyword_top_k,
            keywords: session.view().keywords.clone(),
        })
        .into_response(),
        Err(resp) => resp,
    }
}

/// GET /v1/rate
pub async fn get_rate(State(state): State<GatewayState>) -> Response {
    match session(&state) {
        Ok(session) => Json(RateResponse {
            bucket_ms: state.pipeline.settings().rate_bucket_ms,
            buckets: session.view().rate.clone(),
        })
        .into_response(),
        Err(resp) => resp,
    }
}

/// GET /v1/emotes
pub async fn get_emotes(State(state): State<GatewayState>) -> Response {
    match session(&state) {
        Ok(session) => {
            let emotes = session.emotes();
            Json(EmotesResponse {
                count: emotes.len(),
                emotes: EmoteMap::clone(&emotes),
            })
            .into_response()
        }
        Err(resp) => resp,
    }
}

/// GET /v1/state
pub async fn get_state(State(state): State<GatewayState>) -> Response {
    match session(&state) {
        Ok(session) => Json(StateResponse {
            channel: session.channel().to_string(),
            state: session.state(),
            stored: session.store().len(),
            total_messages: session.store().total_appended(),
        })
        .into_response(),
        Err(resp) => resp,
    }
}
