// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod feed;
pub mod garmin;
pub mod normalize;

pub use feed::{FeedQuery, FeedService, SortOrder, TimeRange};
pub use garmin::{GarminClient, GarminService, Session};
pub use normalize::{map_activity_type, Normalizer};
