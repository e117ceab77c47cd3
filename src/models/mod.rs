// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod garmin;
pub mod post;

pub use garmin::{RemoteActivityRecord, RemoteActivityType, RemoteId};
pub use post::{ActivityType, Comment, Post, UserStats, UserSummary};
