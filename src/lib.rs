// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Feed: Garmin Connect activities as social feed posts
//!
//! This crate signs in to Garmin Connect, lists the configured account's
//! recent activities, and serves them to the frontend as feed posts.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::FeedService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub feed_service: FeedService,
}
