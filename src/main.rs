// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::ridership_repository::RidershipRepository;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::csv_repository::{CsvRidershipRepository, DataSource};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{dashboard_frame, dashboard_page, filter_options, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Load the dataset once; without it the dashboard never starts
    let repository = CsvRidershipRepository::new(DataSource::parse(&config.data.source));
    let dataset = Arc::new(repository.load().await?);

    let addr: SocketAddr = config.server.bind.parse()?;

    // Create services (application layer)
    let dashboard_service = DashboardService::new(dataset, config);

    // Create application state
    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    // Compression is applied per response, so no CompressionLayer here
    let router = Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(health_check))
        .route("/api/filters", get(filter_options))
        .route("/api/dashboard", get(dashboard_frame))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    tracing::info!("Starting ridership-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
