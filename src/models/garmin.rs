// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin Connect activity records as returned by the activity list service.

use serde::Deserialize;

/// Activity identifier. Garmin returns a number, older proxies a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for RemoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteId::Number(n) => write!(f, "{}", n),
            RemoteId::Text(s) => f.write_str(s),
        }
    }
}

/// Activity type tag: either a bare key or the `{ "typeKey": ... }` object.
///
/// Any other shape (null, an object without `typeKey`, a number) lands in
/// `Other` so one odd record cannot fail the whole listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RemoteActivityType {
    Key(String),
    Object {
        #[serde(rename = "typeKey")]
        type_key: String,
    },
    Other(serde_json::Value),
}

impl RemoteActivityType {
    /// Type key, or `""` when Garmin sent something unrecognized.
    pub fn key(&self) -> &str {
        match self {
            RemoteActivityType::Key(key) => key,
            RemoteActivityType::Object { type_key } => type_key,
            RemoteActivityType::Other(_) => "",
        }
    }
}

impl Default for RemoteActivityType {
    fn default() -> Self {
        RemoteActivityType::Key(String::new())
    }
}

/// One activity summary from Garmin Connect. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteActivityRecord {
    pub activity_id: RemoteId,
    #[serde(default)]
    pub activity_type: RemoteActivityType,
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Local wall-clock start, `YYYY-MM-DD HH:MM:SS`
    #[serde(default)]
    pub start_time_local: Option<String>,
    /// UTC start, same format
    #[serde(default, rename = "startTimeGMT")]
    pub start_time_gmt: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub elevation_gain: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    /// Photo identifiers, numeric or string
    #[serde(default)]
    pub photo_ids: Option<Vec<RemoteId>>,
    #[serde(default)]
    pub has_polyline: Option<bool>,
}

impl RemoteActivityRecord {
    pub fn has_polyline(&self) -> bool {
        self.has_polyline.unwrap_or(false)
    }
}

/// Sign-in response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub ticket: Option<String>,
}
