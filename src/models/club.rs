// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Configured Strava club and where its activities are relayed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A Strava club whose member activities are posted to one webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    /// Strava club ID
    pub id: u64,
    /// Slack incoming webhook URL
    pub webhook: String,
    /// Athlete IDs whose activities are never posted
    #[serde(default)]
    pub blocklist: HashSet<u64>,
}

impl Club {
    pub fn is_blocked(&self, athlete_id: Option<u64>) -> bool {
        athlete_id.is_some_and(|id| self.blocklist.contains(&id))
    }
}
