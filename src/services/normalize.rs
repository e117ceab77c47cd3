// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversion of Garmin activity records into feed posts.
//!
//! All ingested activities are attributed to the single configured Garmin
//! account. Engagement (likes, comments) is local to this application, so
//! whatever Garmin reports for it is discarded.

use crate::models::{ActivityType, Post, RemoteActivityRecord, UserStats, UserSummary};
use crate::time_utils::{format_utc_rfc3339, parse_garmin_timestamp};

/// User ID assigned to every post ingested from Garmin.
pub const GARMIN_USER_ID: &str = "garmin";

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// Map a Garmin type key to a feed activity type.
///
/// Matching is case-insensitive. Unknown keys fall into `Workout`.
pub fn map_activity_type(garmin_type: &str) -> ActivityType {
    match garmin_type.trim().to_ascii_lowercase().as_str() {
        "running" => ActivityType::Run,
        "cycling" => ActivityType::Cycle,
        "swimming" => ActivityType::Swim,
        "hiking" => ActivityType::Hike,
        "strength_training" => ActivityType::Workout,
        _ => ActivityType::Workout,
    }
}

/// Turns remote activity records into posts.
#[derive(Debug, Clone)]
pub struct Normalizer {
    base_url: String,
    user: UserSummary,
}

impl Normalizer {
    /// `base_url` is the Garmin Connect root used for photo and map links;
    /// `username` is the configured account every post is attributed to.
    pub fn new(base_url: &str, username: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user: UserSummary {
                id: GARMIN_USER_ID.to_string(),
                username: username.to_string(),
                avatar: format!("{}{}", AVATAR_BASE_URL, urlencoding::encode(username)),
                followers: 0,
                following: 0,
                is_following: false,
                stats: UserStats::default(),
            },
        }
    }

    pub fn normalize(&self, record: &RemoteActivityRecord) -> Post {
        let id = record.activity_id.to_string();

        let images = record
            .photo_ids
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|photo_id| self.photo_url(&id, &photo_id.to_string()))
            .collect();

        let map_url = record.has_polyline().then(|| self.map_url(&id));

        Post {
            user_id: self.user.id.clone(),
            username: self.user.username.clone(),
            activity_type: map_activity_type(record.activity_type.key()),
            title: record.activity_name.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            date: normalize_date(record),
            duration: whole_seconds(record.duration),
            distance: record.distance,
            elevation: record.elevation_gain,
            calories: record.calories,
            images,
            map_url,
            likes: 0,
            comments: Vec::new(),
            user: self.user.clone(),
            id,
        }
    }

    pub fn normalize_all(&self, records: &[RemoteActivityRecord]) -> Vec<Post> {
        records.iter().map(|r| self.normalize(r)).collect()
    }

    fn photo_url(&self, activity_id: &str, photo_id: &str) -> String {
        format!(
            "{}/modern/proxy/activity-service/activity/{}/photo/{}",
            self.base_url,
            activity_id,
            urlencoding::encode(photo_id)
        )
    }

    fn map_url(&self, activity_id: &str) -> String {
        format!(
            "{}/modern/proxy/activity-service/activity/{}/map",
            self.base_url, activity_id
        )
    }
}

/// Prefer the UTC start; fall back to local wall-clock time, then to the
/// raw string.
fn normalize_date(record: &RemoteActivityRecord) -> String {
    if let Some(utc) = record
        .start_time_gmt
        .as_deref()
        .and_then(parse_garmin_timestamp)
    {
        return format_utc_rfc3339(utc.and_utc());
    }

    let local = record.start_time_local.as_deref().unwrap_or_default();
    match parse_garmin_timestamp(local) {
        Some(naive) => naive.format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => {
            tracing::warn!(
                activity_id = %record.activity_id,
                start_time = local,
                "Unparseable activity start time"
            );
            local.to_string()
        }
    }
}

fn whole_seconds(duration: Option<f64>) -> u64 {
    match duration {
        Some(secs) if secs.is_finite() && secs > 0.0 => secs.round() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemoteId;

    fn record(json: serde_json::Value) -> RemoteActivityRecord {
        serde_json::from_value(json).expect("valid record")
    }

    fn normalizer() -> Normalizer {
        Normalizer::new("https://connect.garmin.com", "trail runner")
    }

    #[test]
    fn test_mapped_types_any_casing() {
        let cases = [
            ("running", ActivityType::Run),
            ("RUNNING", ActivityType::Run),
            ("Cycling", ActivityType::Cycle),
            ("sWiMmInG", ActivityType::Swim),
            ("HIKING", ActivityType::Hike),
            ("Strength_Training", ActivityType::Workout),
        ];
        for (input, expected) in cases {
            assert_eq!(map_activity_type(input), expected, "input {}", input);
        }
    }

    #[test]
    fn test_unknown_types_fall_back_to_workout() {
        for input in ["yoga", "YOGA", "", "trail_running", "run", "indoor_cycling"] {
            assert_eq!(map_activity_type(input), ActivityType::Workout, "input {}", input);
        }
    }

    #[test]
    fn test_morning_run_example() {
        let post = normalizer().normalize(&record(serde_json::json!({
            "activityId": "123",
            "activityType": "RUNNING",
            "activityName": "Morning Run",
            "duration": 1800,
            "distance": 5.2
        })));

        assert_eq!(post.id, "123");
        assert_eq!(post.activity_type, ActivityType::Run);
        assert_eq!(post.title, "Morning Run");
        assert_eq!(post.duration, 1800);
        assert_eq!(post.distance, Some(5.2));
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
        assert!(post.images.is_empty());
        assert_eq!(post.map_url, None);
        assert_eq!(post.description, "");
    }

    #[test]
    fn test_photo_urls_preserve_order() {
        let post = normalizer().normalize(&record(serde_json::json!({
            "activityId": 42,
            "activityType": { "typeKey": "hiking" },
            "photoIds": ["p3", "p1", "p2"]
        })));

        assert_eq!(
            post.images,
            vec![
                "https://connect.garmin.com/modern/proxy/activity-service/activity/42/photo/p3",
                "https://connect.garmin.com/modern/proxy/activity-service/activity/42/photo/p1",
                "https://connect.garmin.com/modern/proxy/activity-service/activity/42/photo/p2",
            ]
        );
        assert_eq!(post.activity_type, ActivityType::Hike);
    }

    #[test]
    fn test_map_url_only_with_polyline() {
        let n = normalizer();
        let without = n.normalize(&record(serde_json::json!({
            "activityId": 7, "hasPolyline": false
        })));
        assert_eq!(without.map_url, None);

        let with = n.normalize(&record(serde_json::json!({
            "activityId": 7, "hasPolyline": true
        })));
        assert_eq!(
            with.map_url.as_deref(),
            Some("https://connect.garmin.com/modern/proxy/activity-service/activity/7/map")
        );
    }

    #[test]
    fn test_unrecognized_type_shapes_become_workout() {
        let n = normalizer();
        for activity_type in [
            serde_json::Value::Null,
            serde_json::json!({ "typeId": 9 }),
            serde_json::json!(42),
        ] {
            let post = n.normalize(&record(serde_json::json!({
                "activityId": 5,
                "activityType": activity_type,
                "hasPolyline": null,
                "photoIds": [123]
            })));
            assert_eq!(post.activity_type, ActivityType::Workout);
            assert_eq!(post.map_url, None);
            assert_eq!(
                post.images,
                vec!["https://connect.garmin.com/modern/proxy/activity-service/activity/5/photo/123"]
            );
        }
    }

    #[test]
    fn test_user_summary_comes_from_account() {
        let post = normalizer().normalize(&RemoteActivityRecord {
            activity_id: RemoteId::Number(1),
            activity_type: Default::default(),
            activity_name: None,
            description: Some("Felt good".to_string()),
            start_time_local: None,
            start_time_gmt: None,
            duration: None,
            distance: None,
            elevation_gain: None,
            calories: None,
            photo_ids: None,
            has_polyline: None,
        });

        assert_eq!(post.user_id, GARMIN_USER_ID);
        assert_eq!(post.username, "trail runner");
        assert_eq!(post.user.id, GARMIN_USER_ID);
        assert_eq!(
            post.user.avatar,
            "https://api.dicebear.com/7.x/avataaars/svg?seed=trail%20runner"
        );
        assert_eq!(post.user.followers, 0);
        assert_eq!(post.user.stats, UserStats::default());
        assert_eq!(post.description, "Felt good");
        assert_eq!(post.activity_type, ActivityType::Workout);
    }

    #[test]
    fn test_dates() {
        let n = normalizer();
        let both = n.normalize(&record(serde_json::json!({
            "activityId": 1,
            "startTimeLocal": "2024-03-02 07:15:00",
            "startTimeGMT": "2024-03-02 15:15:00"
        })));
        assert_eq!(both.date, "2024-03-02T15:15:00Z");

        let local_only = n.normalize(&record(serde_json::json!({
            "activityId": 1,
            "startTimeLocal": "2024-03-02 07:15:00"
        })));
        assert_eq!(local_only.date, "2024-03-02T07:15:00");

        let garbage = n.normalize(&record(serde_json::json!({
            "activityId": 1,
            "startTimeLocal": "sometime"
        })));
        assert_eq!(garbage.date, "sometime");
    }

    #[test]
    fn test_duration_rounding() {
        assert_eq!(whole_seconds(Some(1800.4)), 1800);
        assert_eq!(whole_seconds(Some(1800.6)), 1801);
        assert_eq!(whole_seconds(Some(-5.0)), 0);
        assert_eq!(whole_seconds(Some(f64::NAN)), 0);
        assert_eq!(whole_seconds(None), 0);
    }

    #[test]
    fn test_serialized_shape_is_camel_case() {
        let post = normalizer().normalize(&record(serde_json::json!({
            "activityId": 9,
            "activityType": "cycling",
            "hasPolyline": true,
            "elevationGain": 120.0
        })));
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["activityType"], "cycle");
        assert_eq!(json["userId"], "garmin");
        assert_eq!(json["elevation"], 120.0);
        assert!(json["mapUrl"].is_string());
        assert_eq!(json["likes"], 0);
        assert_eq!(json["comments"], serde_json::json!([]));
        assert_eq!(json["user"]["isFollowing"], false);
        assert!(json.get("distance").is_none());
    }
}
