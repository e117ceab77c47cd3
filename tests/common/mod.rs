// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_feed::config::{Config, FeedErrorPolicy};
use activity_feed::routes::create_router;
use activity_feed::services::{FeedService, GarminClient, GarminService};
use activity_feed::AppState;
use mockito::{Matcher, Mock, ServerGuard};
use std::sync::Arc;
use std::time::Duration;

#[allow(dead_code)]
pub const LIST_PATH: &str = "/modern/proxy/activitylist-service/activities/search/activities";

/// Create a Garmin service pointed at the mock server, using the test account.
#[allow(dead_code)]
pub fn test_garmin(base_url: &str) -> GarminService {
    let timeout = Duration::from_secs(Config::test_default(base_url).garmin_timeout_secs);
    test_garmin_with_timeout(base_url, timeout)
}

/// Same as [`test_garmin`] with a custom per-request timeout.
#[allow(dead_code)]
pub fn test_garmin_with_timeout(base_url: &str, timeout: Duration) -> GarminService {
    let config = Config::test_default(base_url);
    let client = GarminClient::new(&config.garmin_base_url, timeout)
        .expect("Failed to build Garmin client");
    GarminService::new(client, config.garmin_username, config.garmin_password)
}

/// Sign-in mock (not yet created) returning `ticket` for the test account.
#[allow(dead_code)]
pub fn mock_sign_in(server: &mut ServerGuard, ticket: &str) -> Mock {
    server
        .mock("POST", "/signin")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "test_athlete".into()),
            Matcher::UrlEncoded("password".into(), "test_password".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!({ "ticket": ticket }).to_string())
}

/// Session mock (not yet created) for `ticket`, setting `SESSIONID`.
#[allow(dead_code)]
pub fn mock_session(server: &mut ServerGuard, ticket: &str, session_id: &str) -> Mock {
    server
        .mock("POST", "/modern")
        .match_header("authorization", format!("Bearer {}", ticket).as_str())
        .with_status(200)
        .with_header(
            "set-cookie",
            &format!("SESSIONID={}; Path=/; HttpOnly", session_id),
        )
}

/// Activity list mock (not yet created) for one session.
#[allow(dead_code)]
pub fn mock_list(
    server: &mut ServerGuard,
    ticket: &str,
    session_id: &str,
    status: usize,
    body: serde_json::Value,
) -> Mock {
    server
        .mock("GET", LIST_PATH)
        .match_header("authorization", format!("Bearer {}", ticket).as_str())
        .match_header("cookie", format!("SESSIONID={}", session_id).as_str())
        .match_query(Matcher::UrlEncoded("start".into(), "0".into()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
}

/// Three activities as Garmin Connect returns them.
#[allow(dead_code)]
pub fn sample_activities() -> serde_json::Value {
    serde_json::json!([
        {
            "activityId": 1001,
            "activityName": "Morning Run",
            "activityType": { "typeId": 1, "typeKey": "running" },
            "startTimeLocal": "2024-03-02 07:15:00",
            "startTimeGMT": "2024-03-02 15:15:00",
            "duration": 1800.0,
            "distance": 5.2,
            "elevationGain": 40.0,
            "calories": 350.0,
            "photoIds": ["ph1", "ph2"],
            "hasPolyline": true
        },
        {
            "activityId": 1002,
            "activityName": "Evening Yoga",
            "activityType": { "typeId": 163, "typeKey": "yoga" },
            "startTimeLocal": "2024-03-01 19:00:00",
            "startTimeGMT": "2024-03-02 03:00:00",
            "duration": 3600.0
        },
        {
            "activityId": 1003,
            "activityName": "Commute",
            "activityType": "CYCLING",
            "startTimeLocal": "2024-02-28 08:00:00",
            "duration": 1250.7,
            "distance": 12.4,
            "hasPolyline": false
        }
    ])
}

/// Create a test app against the mock server. Returns the router and the
/// shared state.
#[allow(dead_code)]
pub fn create_test_app(base_url: &str, policy: FeedErrorPolicy) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default(base_url);
    config.feed_error_policy = policy;

    let feed_service = FeedService::new(
        test_garmin(base_url),
        config.feed_error_policy,
        config.feed_default_limit,
    );

    let state = Arc::new(AppState {
        config,
        feed_service,
    });

    (create_router(state.clone()), state)
}
