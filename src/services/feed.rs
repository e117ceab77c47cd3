// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity feed service.
//!
//! Handles the core workflow:
//! 1. Fetch the latest activities from Garmin Connect
//! 2. Normalize them into posts
//! 3. Apply type / time range filters and ordering
//! 4. Apply the configured error policy

use crate::config::FeedErrorPolicy;
use crate::error::Result;
use crate::models::{ActivityType, Post};
use crate::services::normalize::Normalizer;
use crate::services::GarminService;
use crate::time_utils::parse_post_date;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Reverse;
use std::str::FromStr;

/// Feed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Recent,
    /// Most likes + comments first, newest first on ties
    Popular,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "recent" => Ok(SortOrder::Recent),
            "popular" => Ok(SortOrder::Popular),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// How far back the feed reaches.
///
/// Posts dated only by local wall-clock time are compared as if that time
/// were UTC, so the window edge can shift by the account's UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    All,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
}

impl TimeRange {
    fn window(&self) -> Option<Duration> {
        match self {
            TimeRange::All => None,
            TimeRange::Week => Some(Duration::days(7)),
            TimeRange::Month => Some(Duration::days(30)),
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(TimeRange::All),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            other => Err(format!("unknown time range '{}'", other)),
        }
    }
}

/// Feed request parameters.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    /// Number of activities to fetch; `None` uses the configured default.
    pub limit: Option<u32>,
    /// Only keep this activity type; `None` keeps all.
    pub activity_type: Option<ActivityType>,
    pub sort: SortOrder,
    pub range: TimeRange,
}

/// Builds the activity feed from Garmin Connect.
pub struct FeedService {
    garmin: GarminService,
    normalizer: Normalizer,
    error_policy: FeedErrorPolicy,
    default_limit: u32,
}

impl FeedService {
    pub fn new(garmin: GarminService, error_policy: FeedErrorPolicy, default_limit: u32) -> Self {
        let normalizer = Normalizer::new(garmin.base_url(), garmin.username());
        Self {
            garmin,
            normalizer,
            error_policy,
            default_limit,
        }
    }

    pub fn garmin(&self) -> &GarminService {
        &self.garmin
    }

    /// Fetch, normalize, filter and order the latest activities.
    pub async fn latest(&self, query: &FeedQuery) -> Result<Vec<Post>> {
        let limit = query.limit.unwrap_or(self.default_limit);

        let records = match self.garmin.latest_activities(limit).await {
            Ok(records) => records,
            Err(e) if e.is_upstream() && self.error_policy == FeedErrorPolicy::Empty => {
                tracing::error!(error = %e, "Error loading Garmin activities, serving empty feed");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let posts = self.normalizer.normalize_all(&records);
        Ok(apply_filters(posts, query, Utc::now()))
    }
}

/// Filter and order posts for `query`, with time ranges measured from `now`.
pub fn apply_filters(posts: Vec<Post>, query: &FeedQuery, now: DateTime<Utc>) -> Vec<Post> {
    let cutoff = query.range.window().map(|window| now - window);

    let mut dated: Vec<(Option<DateTime<Utc>>, Post)> = posts
        .into_iter()
        .filter(|post| {
            query
                .activity_type
                .map_or(true, |wanted| post.activity_type == wanted)
        })
        .map(|post| (parse_post_date(&post.date), post))
        .filter(|(date, _)| match cutoff {
            None => true,
            Some(cutoff) => date.is_some_and(|d| d >= cutoff),
        })
        .collect();

    // Stable sorts; undated posts sink to the end.
    match query.sort {
        SortOrder::Recent => dated.sort_by_key(|(date, _)| Reverse(*date)),
        SortOrder::Popular => {
            dated.sort_by_key(|(date, post)| (Reverse(post.engagement()), Reverse(*date)))
        }
    }

    dated.into_iter().map(|(_, post)| post).collect()
}
