// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club polling loop.
//!
//! Each cycle, for every configured club:
//! 1. Fetch recent club activities from Strava
//! 2. Partition them with the activity filter
//! 3. Mark every new activity seen, posted or not
//! 4. Fetch details, format, and post each qualifying activity this cycle
//!    was the first to mark
//!
//! Marking before posting keeps overlapping cycles from posting the same
//! activity twice. A failed post is not retried.
//!
//! The first cycle runs in seed mode: it fills the seen store without
//! posting, so a restart doesn't flood the channel with old activities.

use crate::db::SeenStore;
use crate::models::{ActivitySummary, Club};
use crate::services::filter::ActivityFilter;
use crate::services::formatter::format_activity;
use crate::services::slack::{NotificationDispatcher, SlackIdentity};
use crate::services::strava::ActivityFeed;
use chrono::{DateTime, Utc};
use futures_util::future;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

/// Upper bound on detail fetches/posts in flight for one club.
const MAX_CONCURRENT_DELIVERIES: usize = 8;

/// Whether a cycle may post notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleMode {
    /// Mark everything new as seen, post nothing.
    Seed,
    Live,
}

/// Static settings for the poller.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub clubs: Vec<Club>,
    pub freshness_window: chrono::Duration,
    pub page_size: u32,
    pub interval: Duration,
    pub identity: SlackIdentity,
}

/// Result of delivering one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Posted,
    DetailFailed,
    DispatchFailed,
}

/// Counters for one club in one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubReport {
    pub club_id: u64,
    pub fetched: usize,
    pub already_seen: usize,
    pub excluded: usize,
    /// Qualifying activities not posted because of seed mode.
    pub suppressed: usize,
    pub posted: usize,
    pub detail_failed: usize,
    pub dispatch_failed: usize,
    pub committed: usize,
    /// New to this cycle's filter but marked first by an overlapping cycle.
    pub claimed_elsewhere: usize,
    pub commit_failed: usize,
}

/// How a club's cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClubOutcome {
    /// Completed, possibly with per-activity failures.
    Done(ClubReport),
    /// The feed could not be read; nothing was marked seen.
    Aborted { club_id: u64, error: String },
}

/// Outcome of one full cycle over all clubs.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub mode: CycleMode,
    pub clubs: Vec<ClubOutcome>,
}

impl CycleReport {
    pub fn club(&self, club_id: u64) -> Option<&ClubOutcome> {
        self.clubs.iter().find(|outcome| match outcome {
            ClubOutcome::Done(report) => report.club_id == club_id,
            ClubOutcome::Aborted { club_id: id, .. } => *id == club_id,
        })
    }

    pub fn done(&self) -> impl Iterator<Item = &ClubReport> {
        self.clubs.iter().filter_map(|outcome| match outcome {
            ClubOutcome::Done(report) => Some(report),
            ClubOutcome::Aborted { .. } => None,
        })
    }

    pub fn aborted(&self) -> usize {
        self.clubs.len() - self.done().count()
    }

    pub fn posted(&self) -> usize {
        self.done().map(|r| r.posted).sum()
    }

    pub fn committed(&self) -> usize {
        self.done().map(|r| r.committed).sum()
    }
}

/// Polls club feeds and relays new activities.
#[derive(Clone)]
pub struct Poller {
    feed: Arc<dyn ActivityFeed>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    store: Arc<dyn SeenStore>,
    filter: ActivityFilter,
    settings: Arc<PollSettings>,
}

impl Poller {
    pub fn new(
        feed: Arc<dyn ActivityFeed>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        store: Arc<dyn SeenStore>,
        settings: PollSettings,
    ) -> Self {
        Self {
            feed,
            dispatcher,
            store,
            filter: ActivityFilter::new(settings.freshness_window),
            settings: Arc::new(settings),
        }
    }

    /// Run a seed cycle, then a live cycle every interval until `shutdown`
    /// resolves.
    ///
    /// Live cycles are spawned so a slow cycle never delays the next tick.
    /// On shutdown, cycles already in flight are allowed to finish.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.run_cycle(CycleMode::Seed).await;

        let mut ticker = tokio::time::interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick fires immediately; the seed cycle covered it.
        ticker.tick().await;

        let mut cycles = JoinSet::new();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(in_flight = cycles.len(), "Shutting down poller");
                    break;
                }
                _ = ticker.tick() => {
                    let poller = self.clone();
                    cycles.spawn(async move {
                        poller.run_cycle(CycleMode::Live).await;
                    });
                }
                Some(result) = cycles.join_next(), if !cycles.is_empty() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Poll cycle task failed");
                    }
                }
            }
        }

        while let Some(result) = cycles.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Poll cycle task failed");
            }
        }
    }

    /// Poll every club once.
    pub async fn run_cycle(&self, mode: CycleMode) -> CycleReport {
        self.run_cycle_at(mode, Utc::now()).await
    }

    /// Poll every club once, judging freshness against `now`.
    pub async fn run_cycle_at(&self, mode: CycleMode, now: DateTime<Utc>) -> CycleReport {
        let clubs = future::join_all(
            self.settings
                .clubs
                .iter()
                .map(|club| self.poll_club(club, mode, now)),
        )
        .await;

        let report = CycleReport { mode, clubs };
        tracing::info!(
            mode = ?mode,
            clubs = report.clubs.len(),
            aborted = report.aborted(),
            posted = report.posted(),
            committed = report.committed(),
            "Poll cycle complete"
        );
        report
    }

    /// Fetch, filter, commit, and deliver for one club.
    pub async fn poll_club(
        &self,
        club: &Club,
        mode: CycleMode,
        now: DateTime<Utc>,
    ) -> ClubOutcome {
        let activities = match self
            .feed
            .list_club_activities(club.id, self.settings.page_size)
            .await
        {
            Ok(activities) => activities,
            Err(e) => {
                if e.is_strava_rate_limit() {
                    tracing::warn!(club_id = club.id, "Strava rate limit hit, skipping club");
                } else if e.is_strava_token_error() {
                    tracing::error!(
                        club_id = club.id,
                        error = %e,
                        "Strava rejected the access token; check STRAVA_ACCESS_TOKEN"
                    );
                } else {
                    tracing::error!(club_id = club.id, error = %e, "Error listing activities");
                }
                return ClubOutcome::Aborted {
                    club_id: club.id,
                    error: e.to_string(),
                };
            }
        };

        let mut report = ClubReport {
            club_id: club.id,
            fetched: activities.len(),
            ..Default::default()
        };

        if activities.is_empty() {
            tracing::info!(club_id = club.id, "No activities found");
            return ClubOutcome::Done(report);
        }

        let partition = match self
            .filter
            .partition(activities, club, now, self.store.as_ref())
            .await
        {
            Ok(partition) => partition,
            Err(e) => {
                tracing::error!(club_id = club.id, error = %e, "Error checking seen activities");
                return ClubOutcome::Aborted {
                    club_id: club.id,
                    error: e.to_string(),
                };
            }
        };

        report.already_seen = partition.already_seen;
        report.excluded = partition.bookkeeping.len();

        tracing::info!(
            club_id = club.id,
            count = partition.to_notify.len(),
            initial = mode == CycleMode::Seed,
            "Checked for activities"
        );

        let to_mark = partition.ids_to_mark();
        let claimed: HashSet<u64> = match self.store.mark_seen_many(&to_mark).await {
            Ok(recorded) => {
                report.claimed_elsewhere = to_mark.len() - recorded.len();
                recorded.into_iter().collect()
            }
            Err(e) => {
                report.commit_failed = to_mark.len();
                tracing::error!(
                    club_id = club.id,
                    count = to_mark.len(),
                    error = %e,
                    "Failed to mark activities seen, not posting them"
                );
                HashSet::new()
            }
        };
        report.committed = claimed.len();

        match mode {
            CycleMode::Seed => report.suppressed = partition.to_notify.len(),
            CycleMode::Live => {
                let ready: Vec<&ActivitySummary> = partition
                    .to_notify
                    .iter()
                    .filter(|summary| claimed.contains(&summary.id))
                    .collect();

                for batch in ready.chunks(MAX_CONCURRENT_DELIVERIES) {
                    let deliveries =
                        future::join_all(batch.iter().map(|summary| self.deliver(club, summary)))
                            .await;

                    for delivery in deliveries {
                        match delivery {
                            Delivery::Posted => report.posted += 1,
                            Delivery::DetailFailed => report.detail_failed += 1,
                            Delivery::DispatchFailed => report.dispatch_failed += 1,
                        }
                    }
                }
            }
        }

        ClubOutcome::Done(report)
    }

    /// Fetch details for one activity and post it to the club's webhook.
    async fn deliver(&self, club: &Club, summary: &ActivitySummary) -> Delivery {
        let activity = match self.feed.get_activity(summary.id).await {
            Ok(activity) => activity,
            Err(e) => {
                tracing::error!(
                    club_id = club.id,
                    activity_id = summary.id,
                    error = %e,
                    "Error fetching activity details"
                );
                return Delivery::DetailFailed;
            }
        };

        let text = format_activity(&summary.athlete, &activity);
        let payload = self
            .settings
            .identity
            .payload(text, activity.primary_photo_url());

        match self.dispatcher.send(&club.webhook, &payload).await {
            Ok(()) => Delivery::Posted,
            Err(e) => {
                tracing::error!(
                    club_id = club.id,
                    activity_id = summary.id,
                    webhook = %club.webhook,
                    error = %e,
                    "Error posting message to Slack"
                );
                Delivery::DispatchFailed
            }
        }
    }
}
