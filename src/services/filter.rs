// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Decide which fetched activities get posted.
//!
//! Rules, first match wins:
//! 1. Seen: already in the seen store. Dropped, not re-marked.
//! 2. Stale: started at or before `now - window`. Marked seen, not posted.
//! 3. Blocked: athlete is on the club blocklist. Marked seen, not posted.
//! 4. Commute: cycling activity flagged as a commute. Marked seen, not posted.
//!
//! Anything else is posted and marked seen.

use crate::db::SeenStore;
use crate::error::AppError;
use crate::models::{ActivitySummary, Club};
use crate::time_utils::freshness_cutoff;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Outcome of classifying one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Seen,
    Stale,
    Blocked,
    Commute,
    Notify,
}

impl Classification {
    /// True for every outcome that must be recorded in the seen store.
    pub fn should_mark_seen(self) -> bool {
        !matches!(self, Classification::Seen)
    }
}

/// Activities split by what happens to them.
#[derive(Debug, Default, Clone)]
pub struct Partition {
    /// New activities that qualify for a notification.
    pub to_notify: Vec<ActivitySummary>,
    /// New activities excluded by stale/blocked/commute rules.
    pub bookkeeping: Vec<(ActivitySummary, Classification)>,
    /// Activities already in the seen store.
    pub already_seen: usize,
}

impl Partition {
    /// IDs to commit to the seen store, each exactly once.
    pub fn ids_to_mark(&self) -> Vec<u64> {
        let mut seen = HashSet::new();
        self.to_notify
            .iter()
            .map(|a| a.id)
            .chain(self.bookkeeping.iter().map(|(a, _)| a.id))
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Activity filter with a configurable freshness window.
#[derive(Debug, Clone, Copy)]
pub struct ActivityFilter {
    freshness_window: Duration,
}

impl ActivityFilter {
    pub fn new(freshness_window: Duration) -> Self {
        Self { freshness_window }
    }

    /// Classify one activity given whether it has already been seen.
    pub fn classify(
        &self,
        activity: &ActivitySummary,
        club: &Club,
        now: DateTime<Utc>,
        is_seen: bool,
    ) -> Classification {
        if is_seen {
            Classification::Seen
        } else if activity.start_date <= freshness_cutoff(now, self.freshness_window) {
            Classification::Stale
        } else if club.is_blocked(activity.athlete.id) {
            Classification::Blocked
        } else if activity.activity_type.is_cycling() && activity.commute {
            Classification::Commute
        } else {
            Classification::Notify
        }
    }

    /// Look up each activity in the seen store and partition the list.
    ///
    /// Does not mutate the store. A feed that repeats an ID within one page
    /// only yields it once.
    pub async fn partition(
        &self,
        activities: Vec<ActivitySummary>,
        club: &Club,
        now: DateTime<Utc>,
        store: &dyn SeenStore,
    ) -> Result<Partition, AppError> {
        let mut partition = Partition::default();
        let mut batch = HashSet::new();

        for activity in activities {
            let is_seen = !batch.insert(activity.id) || store.has(activity.id).await?;

            match self.classify(&activity, club, now, is_seen) {
                Classification::Seen => partition.already_seen += 1,
                Classification::Notify => partition.to_notify.push(activity),
                excluded => {
                    tracing::debug!(
                        club_id = club.id,
                        activity_id = activity.id,
                        reason = ?excluded,
                        "Activity excluded from notification"
                    );
                    partition.bookkeeping.push((activity, excluded));
                }
            }
        }

        Ok(partition)
    }
}
