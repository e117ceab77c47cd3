// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Garmin credentials are resolved once at startup and held in memory only.

use secrecy::SecretString;
use std::env;
use std::str::FromStr;

/// Default Garmin Connect endpoint.
pub const DEFAULT_GARMIN_BASE_URL: &str = "https://connect.garmin.com";

/// Upper bound for a single activity listing request.
pub const MAX_FEED_LIMIT: u32 = 100;

/// Default per-request timeout for Garmin Connect calls, in seconds.
pub const DEFAULT_GARMIN_TIMEOUT_SECS: u64 = 15;

/// What the feed endpoint does when Garmin Connect cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedErrorPolicy {
    /// Return the error to the caller (502 with a retryable body).
    #[default]
    Surface,
    /// Log the error and serve an empty feed.
    Empty,
}

impl FromStr for FeedErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(FeedErrorPolicy::Surface),
            "empty" => Ok(FeedErrorPolicy::Empty),
            _ => Err(ConfigError::Invalid("FEED_ERROR_POLICY")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Garmin Connect base URL
    pub garmin_base_url: String,
    /// Garmin Connect account name
    pub garmin_username: String,
    /// Per-request timeout for Garmin Connect calls
    pub garmin_timeout_secs: u64,
    /// Number of activities the feed returns when the caller gives no limit
    pub feed_default_limit: u32,
    /// Behavior when the upstream service fails
    pub feed_error_policy: FeedErrorPolicy,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Garmin Connect password
    pub garmin_password: SecretString,
}

impl Config {
    /// Config for tests only, pointing at the given Garmin base URL.
    pub fn test_default(garmin_base_url: &str) -> Self {
        Self {
            garmin_base_url: garmin_base_url.trim_end_matches('/').to_string(),
            garmin_username: "test_athlete".to_string(),
            garmin_timeout_secs: 5,
            feed_default_limit: 10,
            feed_error_policy: FeedErrorPolicy::Surface,
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            garmin_password: SecretString::from("test_password"),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let garmin_username = env::var("GARMIN_USERNAME")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("GARMIN_USERNAME"))?;
        if garmin_username.is_empty() {
            return Err(ConfigError::Missing("GARMIN_USERNAME"));
        }

        let garmin_password = env::var("GARMIN_PASSWORD")
            .map_err(|_| ConfigError::Missing("GARMIN_PASSWORD"))?;
        if garmin_password.is_empty() {
            return Err(ConfigError::Missing("GARMIN_PASSWORD"));
        }

        let feed_error_policy = match env::var("FEED_ERROR_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => FeedErrorPolicy::default(),
        };

        let garmin_timeout_secs: u64 =
            parse_var("GARMIN_TIMEOUT_SECS")?.unwrap_or(DEFAULT_GARMIN_TIMEOUT_SECS);
        if garmin_timeout_secs == 0 {
            return Err(ConfigError::Invalid("GARMIN_TIMEOUT_SECS"));
        }

        Ok(Self {
            garmin_base_url: env::var("GARMIN_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GARMIN_BASE_URL.to_string()),
            garmin_username,
            garmin_timeout_secs,
            feed_default_limit: parse_var::<u32>("FEED_DEFAULT_LIMIT")?
                .unwrap_or(10)
                .clamp(1, MAX_FEED_LIMIT),
            feed_error_policy,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_var("PORT")?.unwrap_or(8080),
            garmin_password: SecretString::from(garmin_password),
        })
    }
}

/// Read an optional numeric variable. Present but unparseable is an error.
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
