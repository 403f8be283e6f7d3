// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod club;
pub mod seen;

pub use activity::{Activity, ActivityPhotos, ActivitySummary, ActivityType, Athlete};
pub use club::Club;
pub use seen::SeenRecord;
