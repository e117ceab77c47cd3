// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed API routes.

use crate::config::MAX_FEED_LIMIT;
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Post};
use crate::services::{FeedQuery, SortOrder, TimeRange};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/feed", get(get_feed))
}

// ─── Feed ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FeedParams {
    /// Number of activities to fetch (1..=100)
    limit: Option<u32>,
    /// Activity type filter, or "all"
    #[serde(rename = "type")]
    activity_type: Option<String>,
    /// "recent" or "popular"
    sort: Option<String>,
    /// "all", "week" or "month"
    range: Option<String>,
}

impl FeedParams {
    fn into_query(self) -> Result<FeedQuery> {
        if let Some(limit) = self.limit {
            if !(1..=MAX_FEED_LIMIT).contains(&limit) {
                return Err(AppError::BadRequest(format!(
                    "'limit' must be between 1 and {}",
                    MAX_FEED_LIMIT
                )));
            }
        }

        let activity_type = match self.activity_type.as_deref() {
            None | Some("all") => None,
            Some(raw) => Some(raw.parse::<ActivityType>().map_err(AppError::BadRequest)?),
        };

        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()
            .map_err(AppError::BadRequest)?
            .unwrap_or_default();

        let range = self
            .range
            .as_deref()
            .map(str::parse::<TimeRange>)
            .transpose()
            .map_err(AppError::BadRequest)?
            .unwrap_or_default();

        Ok(FeedQuery {
            limit: self.limit,
            activity_type,
            sort,
            range,
        })
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FeedResponse {
    pub posts: Vec<Post>,
    pub count: u32,
}

/// Get the latest activities as feed posts.
async fn get_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>> {
    let query = params.into_query()?;

    tracing::debug!(
        limit = ?query.limit,
        activity_type = ?query.activity_type,
        sort = ?query.sort,
        range = ?query.range,
        "Fetching feed"
    );

    let posts = state.feed_service.latest(&query).await?;

    Ok(Json(FeedResponse {
        count: posts.len() as u32,
        posts,
    }))
}
