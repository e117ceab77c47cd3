// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed post model served to the frontend.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Closed set of activity categories shown in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Run,
    Cycle,
    Swim,
    Hike,
    /// Catch-all for anything not otherwise recognized.
    Workout,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Run => "run",
            ActivityType::Cycle => "cycle",
            ActivityType::Swim => "swim",
            ActivityType::Hike => "hike",
            ActivityType::Workout => "workout",
        }
    }
}

impl FromStr for ActivityType {
    type Err = String;

    /// Parse an internal type name (`run`, `cycle`, ...). Strict: this is for
    /// user input, not for Garmin type keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "run" => Ok(ActivityType::Run),
            "cycle" => Ok(ActivityType::Cycle),
            "swim" => Ok(ActivityType::Swim),
            "hike" => Ok(ActivityType::Hike),
            "workout" => Ok(ActivityType::Workout),
            other => Err(format!("unknown activity type '{}'", other)),
        }
    }
}

/// Aggregate stats shown on the profile card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStats {
    pub total_activities: u32,
    /// Kilometers
    pub total_distance: f64,
    /// Seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration: u64,
}

/// Denormalized author summary embedded in every post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub avatar: String,
    pub followers: u32,
    pub following: u32,
    pub is_following: bool,
    pub stats: UserStats,
}

/// Comment thread entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    /// ISO 8601
    pub date: String,
    pub replies: Vec<Comment>,
    pub likes: u32,
}

/// A single activity post in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Post {
    /// Source activity ID
    pub id: String,
    /// Owning user
    pub user_id: String,
    pub username: String,
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    /// Start date/time (ISO 8601)
    pub date: String,
    /// Seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Meters of climbing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    pub likes: u32,
    pub comments: Vec<Comment>,
    pub user: UserSummary,
}

impl Post {
    /// Engagement score used for "popular" ordering.
    pub fn engagement(&self) -> usize {
        self.likes as usize + self.comments.len()
    }
}
