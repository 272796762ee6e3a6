// SPDX-FileCopyrightText: 2026 Chatpulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatpulse watch` and `chatpulse serve` command implementations.
//!
//! Both join one channel through a [`Pipeline`]. `watch` logs a summary of
//! the derived views on an interval; `serve` exposes them over HTTP with
//! Prometheus metrics at `/metrics`.

use std::sync::Arc;
use std::time::Duration;

use chatpulse_agent::{install_signal_handler, AnalyticsView, Collaborators, Pipeline, SessionSettings};
use chatpulse_config::model::ChatpulseConfig;
use chatpulse_core::error::ChatpulseError;
use chatpulse_gateway::{start_server, GatewayState, MetricsRender, ServerConfig};
use chatpulse_prometheus::{MetricsObserver, PrometheusAdapter};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

fn build_pipeline(config: &ChatpulseConfig) -> Result<Arc<Pipeline>, ChatpulseError> {
    let collab = Collaborators::from_config(config, Arc::new(MetricsObserver))?;
    Ok(Arc::new(Pipeline::new(SessionSettings::from_config(config), collab)))
}

/// Runs `chatpulse watch <channel>`.
pub async fn run_watch(
    config: ChatpulseConfig,
    channel: &str,
    every_secs: u64,
) -> Result<(), ChatpulseError> {
    init_tracing(&config.agent.log_level);
    let cancel = install_signal_handler();

    let pipeline = build_pipeline(&config)?;
    let session = pipeline.select_channel(channel).await?;

    let mut ticker = tokio::time::interval(Duration::from_secs(every_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ingestion = session.join_ingestion();
    tokio::pin!(ingestion);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            ended = &mut ingestion => {
                match ended {
                    Some(Ok(end)) => info!(?end, "chat connection ended"),
                    Some(Err(e)) => warn!(error = %e, "chat connection failed"),
                    None => {}
                }
                log_summary(&session.view());
                break;
            }
            _ = ticker.tick() => log_summary(&session.view()),
        }
    }

    pipeline.shutdown().await;
    info!("chatpulse watch stopped");
    Ok(())
}

/// Runs `chatpulse serve <channel>`.
pub async fn run_serve(config: ChatpulseConfig, channel: &str) -> Result<(), ChatpulseError> {
    init_tracing(&config.agent.log_level);
    let cancel = install_signal_handler();

    let prometheus_render: Option<MetricsRender> = match PrometheusAdapter::new() {
        Ok(adapter) => {
            info!("prometheus metrics enabled");
            Some(Arc::new(move || adapter.render()))
        }
        Err(e) => {
            warn!(error = %e, "prometheus initialization failed, continuing without metrics");
            None
        }
    };

    let pipeline = build_pipeline(&config)?;
    pipeline.select_channel(channel).await?;

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let state = GatewayState::new(Arc::clone(&pipeline), prometheus_render);
    let result = start_server(&server_config, state, cancel.clone()).await;

    // The server also returns early on bind failure; stop the session either way.
    cancel.cancel();
    pipeline.shutdown().await;
    info!("chatpulse serve stopped");
    result
}

/// Logs the top keywords, the strongest emotions, and the latest rate bucket.
fn log_summary(view: &AnalyticsView) {
    let keywords: Vec<String> = view
        .keywords
        .iter()
        .take(5)
        .map(|k| format!("{}={}", k.token, k.count))
        .collect();

    let mut emotions: Vec<(&String, &f64)> = view.emotions.iter().collect();
    emotions.sort_by(|a, b| b.1.total_cmp(a.1));
    let emotions: Vec<String> = emotions
        .into_iter()
        .take(3)
        .map(|(category, score)| format!("{category}={score:.2}"))
        .collect();

    info!(
        channel = %view.channel,
        state = %view.state,
        stored = view.messages.len(),
        total = view.total_messages,
        latest_rate = view.rate.last().copied().unwrap_or(0),
        keywords = %keywords.join(" "),
        emotions = %emotions.join(" "),
        "chat summary"
    );
}

/// Initialize the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatpulse={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
