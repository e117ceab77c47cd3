// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin Connect client for signing in and listing recent activities.
//!
//! Handles:
//! - Two-step sign-in (credential ticket, then session cookie)
//! - Activity listing with bearer ticket and session cookie
//! - Re-authentication when the session is rejected (401)
//! - A single retry on transient network failures

use crate::config::MAX_FEED_LIMIT;
use crate::error::AppError;
use crate::models::garmin::{RemoteActivityRecord, SignInResponse};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Cookie name Garmin Connect expects the session identifier under.
const SESSION_COOKIE: &str = "SESSIONID";

/// Path of the activity search endpoint, relative to the base URL.
const ACTIVITY_LIST_PATH: &str = "/modern/proxy/activitylist-service/activities/search/activities";

/// Authorized Garmin Connect session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub ticket: String,
    pub session_id: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("ticket", &"[REDACTED]")
            .field("session_id", &"[REDACTED]")
            .finish()
    }
}

/// Why an activity listing failed.
#[derive(Debug)]
pub enum ListError {
    /// The session was rejected and should be re-established.
    Unauthorized,
    /// Connect error or timeout; worth one more attempt.
    Transient(String),
    /// Anything else.
    Failed(String),
}

impl From<ListError> for AppError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::Unauthorized => {
                tracing::warn!("Garmin rejected session for activity listing");
            }
            ListError::Transient(msg) | ListError::Failed(msg) => {
                tracing::error!(error = %msg, "Garmin activity listing failed");
            }
        }
        AppError::fetch()
    }
}

/// Garmin Connect API client.
#[derive(Clone)]
pub struct GarminClient {
    http: reqwest::Client,
    base_url: String,
}

impl GarminClient {
    /// Create a new client against `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run the sign-in handshake and return a fresh session.
    ///
    /// Every failure maps to the same generic authentication error; the
    /// underlying cause is logged without credential values.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Session, AppError> {
        let ticket = self.sign_in(username, password).await?;
        let session_id = self.open_session(&ticket).await?;

        tracing::info!(username, "Garmin session established");
        Ok(Session { ticket, session_id })
    }

    /// Step 1: exchange credentials for a ticket.
    async fn sign_in(&self, username: &str, password: &SecretString) -> Result<String, AppError> {
        let url = format!("{}/signin", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("username", username),
                ("password", password.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e.without_url(), "Garmin sign-in request failed");
                AppError::authentication()
            })?;

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "Garmin sign-in rejected");
            return Err(AppError::authentication());
        }

        let body: SignInResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Garmin sign-in response was not valid JSON");
            AppError::authentication()
        })?;

        body.ticket
            .filter(|ticket| !ticket.is_empty())
            .ok_or_else(|| {
                tracing::error!("Garmin sign-in response had no ticket");
                AppError::authentication()
            })
    }

    /// Step 2: exchange the ticket for a session cookie.
    async fn open_session(&self, ticket: &str) -> Result<String, AppError> {
        let url = format!("{}/modern", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(ticket)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e.without_url(), "Garmin session request failed");
                AppError::authentication()
            })?;

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "Garmin session request rejected");
            return Err(AppError::authentication());
        }

        let cookies: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();

        session_id_from_cookies(&cookies).ok_or_else(|| {
            tracing::error!("Garmin session response had no session cookie");
            AppError::authentication()
        })
    }

    /// List the most recent activities, newest first.
    pub async fn list_activities(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<RemoteActivityRecord>, ListError> {
        let url = format!("{}{}", self.base_url, ACTIVITY_LIST_PATH);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&session.ticket)
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, session.session_id))
            .query(&[("limit", limit.to_string()), ("start", "0".to_string())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ListError::Transient(e.to_string())
                } else {
                    ListError::Failed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ListError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListError::Failed(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| ListError::Failed(format!("JSON parse error: {}", e)))
    }
}

/// Pick the session identifier out of `Set-Cookie` values.
///
/// Prefers the `SESSIONID` cookie; otherwise falls back to the first cookie.
pub fn session_id_from_cookies(cookies: &[&str]) -> Option<String> {
    let parsed: Vec<(Option<&str>, &str)> = cookies
        .iter()
        .filter_map(|raw| {
            let pair = raw.split(';').next()?.trim();
            match pair.split_once('=') {
                Some((name, value)) => Some((Some(name.trim()), value.trim())),
                None => Some((None, pair)),
            }
        })
        .filter(|(_, value)| !value.is_empty())
        .collect();

    parsed
        .iter()
        .find(|(name, _)| *name == Some(SESSION_COOKIE))
        .or_else(|| parsed.first())
        .map(|(_, value)| value.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// GarminService - High-level service with session management
// ─────────────────────────────────────────────────────────────────────────────

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// High-level Garmin service that owns the account session.
///
/// Cloning is cheap and all clones share one session. The first caller
/// without a session performs the handshake while the rest wait on it.
#[derive(Clone)]
pub struct GarminService {
    client: GarminClient,
    username: String,
    password: SecretString,
    /// Current session, if any.
    session: Arc<RwLock<Option<Arc<Session>>>>,
    /// Serializes the sign-in handshake.
    auth_lock: Arc<Mutex<()>>,
}

impl GarminService {
    pub fn new(client: GarminClient, username: String, password: SecretString) -> Self {
        Self {
            client,
            username,
            password,
            session: Arc::new(RwLock::new(None)),
            auth_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Snapshot of the current session, without authenticating.
    pub async fn session(&self) -> Option<Arc<Session>> {
        self.session.read().await.clone()
    }

    // ─── Session Management ──────────────────────────────────────────────────

    /// Return the current session, signing in if there is none.
    async fn current_session(&self) -> Result<Arc<Session>, AppError> {
        // Fast path
        if let Some(session) = self.session().await {
            return Ok(session);
        }

        let _guard = self.auth_lock.lock().await;

        // Another task may have signed in while we waited.
        if let Some(session) = self.session().await {
            return Ok(session);
        }

        tracing::debug!(username = %self.username, "No Garmin session, signing in");
        let session = Arc::new(
            self.client
                .authenticate(&self.username, &self.password)
                .await?,
        );
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Drop `stale` if it is still the current session.
    async fn invalidate(&self, stale: &Arc<Session>) {
        let mut slot = self.session.write().await;
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, stale)) {
            *slot = None;
        }
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Fetch the latest `limit` activities (clamped to `1..=100`).
    pub async fn latest_activities(
        &self,
        limit: u32,
    ) -> Result<Vec<RemoteActivityRecord>, AppError> {
        let limit = limit.clamp(1, MAX_FEED_LIMIT);
        let session = self.current_session().await?;

        match self.list_with_retry(&session, limit).await {
            Ok(records) => {
                tracing::debug!(count = records.len(), limit, "Fetched Garmin activities");
                Ok(records)
            }
            Err(ListError::Unauthorized) => {
                tracing::info!("Garmin session expired, re-authenticating");
                self.invalidate(&session).await;
                let session = self.current_session().await?;
                Ok(self.list_with_retry(&session, limit).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List activities, retrying once on a transient network failure.
    async fn list_with_retry(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<RemoteActivityRecord>, ListError> {
        match self.client.list_activities(session, limit).await {
            Err(ListError::Transient(msg)) => {
                tracing::warn!(error = %msg, "Transient Garmin failure, retrying once");
                self.client.list_activities(session, limit).await
            }
            other => other,
        }
    }
}
