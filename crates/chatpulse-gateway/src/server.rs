// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{routing::get, Router};
use chatpulse_agent::Pipeline;
use chatpulse_core::error::ChatpulseError;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Render function for the Prometheus text exposition.
pub type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

/// Health state for the health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// `None` disables `/metrics`.
    pub prometheus_render: Option<MetricsRender>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<Pipeline>,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(pipeline: Arc<Pipeline>, prometheus_render: Option<MetricsRender>) -> Self {
        Self {
            pipeline,
            health: HealthState {
                start_time: std::time::Instant::now(),
                prometheus_render,
            },
        }
    }
}

/// Gateway server configuration (mirrors `GatewayConfig` from chatpulse-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the router. Every route is a GET.
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics));

    let api_routes = Router::new()
        .route("/v1/messages", get(handlers::get_messages))
        .route("/v1/messages/{author}", get(handlers::get_author_messages))
        .route("/v1/emotions", get(handlers::get_emotions))
        .route("/v1/keywords", get(handlers::get_keywords))
        .route("/v1/rate", get(handlers::get_rate))
        .route("/v1/emotes", get(handlers::get_emotes))
        .route("/v1/state", get(handlers::get_state));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the gateway on `host:port` until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), ChatpulseError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ChatpulseError::transport(format!("failed to bind gateway to {addr}"), e))?;

    tracing::info!("gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ChatpulseError::transport("gateway server error", e))?;

    Ok(())
}
