// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{Router, routing::{get, post}};
use tower_http::trace::TraceLayer;

use crate::application::chart_service::ChartService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::youtube_repository::YouTubeRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    channel_chart, chart_from_items, health_check, list_axes, status,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;
    if app_config.youtube.api_key.is_empty() {
        tracing::warn!("No video API key configured; channel charts will be empty");
    }

    // Create video source (infrastructure layer)
    let source = Arc::new(YouTubeRepository::new(&app_config.youtube)?);

    // Create services (application layer)
    let chart_service = ChartService::new(source);

    // Create application state
    let state = Arc::new(AppState {
        chart_service,
        default_layout: app_config.chart,
    });

    // Build router (presentation layer)
    // Responses are Brotli-compressed by the handlers themselves, so no
    // CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/status", get(status))
        .route("/axes", get(list_axes))
        .route("/channels/:channel/chart", get(channel_chart))
        .route("/charts", post(chart_from_items))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config.server.bind.parse()?;
    tracing::info!("Starting channel-metrics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
