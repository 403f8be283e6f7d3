// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Dedup record for activities that have already been processed.

use crate::time_utils::format_utc_rfc3339;
use serde::{Deserialize, Serialize};

/// Stored marker that an activity has been handled. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenRecord {
    /// Strava activity ID (also used as document ID)
    pub activity_id: u64,
    /// When the activity was first marked seen (RFC3339)
    pub seen_at: String,
}

impl SeenRecord {
    pub fn now(activity_id: u64) -> Self {
        Self {
            activity_id,
            seen_at: format_utc_rfc3339(chrono::Utc::now()),
        }
    }
}
