// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Feed API Server
//!
//! Serves the configured Garmin Connect account's recent activities as
//! social feed posts.

use activity_feed::{
    config::Config,
    services::{FeedService, GarminClient, GarminService},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        garmin_base_url = %config.garmin_base_url,
        username = %config.garmin_username,
        "Starting Activity Feed API"
    );

    // One Garmin client per process, owned here and injected into the feed
    let client = GarminClient::new(
        &config.garmin_base_url,
        Duration::from_secs(config.garmin_timeout_secs),
    )?;
    let garmin = GarminService::new(
        client,
        config.garmin_username.clone(),
        config.garmin_password.clone(),
    );
    let feed_service = FeedService::new(
        garmin,
        config.feed_error_policy,
        config.feed_default_limit,
    );
    tracing::info!(
        error_policy = ?config.feed_error_policy,
        default_limit = config.feed_default_limit,
        "Feed service initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        feed_service,
    });

    // Build router
    let app = activity_feed::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("activity_feed=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
