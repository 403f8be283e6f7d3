// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fitbot::db::{MemorySeenStore, SeenStore};
use fitbot::error::AppError;
use fitbot::models::{Activity, ActivitySummary, ActivityType, Athlete, Club};
use fitbot::services::{
    ActivityFeed, NotificationDispatcher, PollSettings, Poller, SlackIdentity, SlackPayload,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Fixed "now" for deterministic freshness checks.
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn club(id: u64) -> Club {
    Club {
        id,
        webhook: format!("https://hooks.slack.test/club/{}", id),
        blocklist: HashSet::new(),
    }
}

/// Summary started an hour before `test_now()`.
#[allow(dead_code)]
pub fn summary(id: u64, activity_type: ActivityType) -> ActivitySummary {
    ActivitySummary {
        id,
        name: format!("Activity {}", id),
        activity_type,
        distance: 1609.34,
        start_date: test_now() - Duration::hours(1),
        commute: false,
        athlete: Athlete {
            id: Some(100 + id),
            firstname: "Alice".to_string(),
            lastname: "Smith".to_string(),
        },
    }
}

/// Detail record matching a summary.
#[allow(dead_code)]
pub fn detail_for(summary: &ActivitySummary) -> Activity {
    Activity {
        id: summary.id,
        name: summary.name.clone(),
        activity_type: summary.activity_type.clone(),
        distance: summary.distance,
        start_date: summary.start_date,
        commute: summary.commute,
        photos: None,
    }
}

/// Activity feed with canned per-club responses.
#[derive(Default)]
pub struct ScriptedFeed {
    clubs: Mutex<HashMap<u64, Result<Vec<ActivitySummary>, String>>>,
    details: Mutex<HashMap<u64, Activity>>,
    list_calls: Mutex<Vec<u64>>,
    detail_calls: Mutex<Vec<u64>>,
    detail_delay: Mutex<Option<std::time::Duration>>,
}

#[allow(dead_code)]
impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `activities` for `club_id`, with details derived from each.
    pub fn set_club(&self, club_id: u64, activities: Vec<ActivitySummary>) {
        let mut details = self.details.lock().unwrap();
        for activity in &activities {
            details
                .entry(activity.id)
                .or_insert_with(|| detail_for(activity));
        }
        self.clubs.lock().unwrap().insert(club_id, Ok(activities));
    }

    pub fn fail_club(&self, club_id: u64, message: &str) {
        self.clubs
            .lock()
            .unwrap()
            .insert(club_id, Err(message.to_string()));
    }

    pub fn set_detail(&self, activity: Activity) {
        self.details.lock().unwrap().insert(activity.id, activity);
    }

    pub fn remove_detail(&self, activity_id: u64) {
        self.details.lock().unwrap().remove(&activity_id);
    }

    /// Hold every detail fetch for `delay` before answering.
    pub fn set_detail_delay(&self, delay: std::time::Duration) {
        *self.detail_delay.lock().unwrap() = Some(delay);
    }

    pub fn list_calls(&self) -> Vec<u64> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<u64> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityFeed for ScriptedFeed {
    async fn list_club_activities(
        &self,
        club_id: u64,
        _per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        self.list_calls.lock().unwrap().push(club_id);
        match self.clubs.lock().unwrap().get(&club_id) {
            Some(Ok(activities)) => Ok(activities.clone()),
            Some(Err(message)) => Err(AppError::StravaApi(message.clone())),
            None => Ok(vec![]),
        }
    }

    async fn get_activity(&self, activity_id: u64) -> Result<Activity, AppError> {
        self.detail_calls.lock().unwrap().push(activity_id);
        let delay = *self.detail_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.details
            .lock()
            .unwrap()
            .get(&activity_id)
            .cloned()
            .ok_or_else(|| AppError::StravaApi("HTTP 404 Not Found: ".to_string()))
    }
}

/// Dispatcher that records every payload instead of posting.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<(String, SlackPayload)>>,
    failing: Mutex<HashSet<String>>,
}

#[allow(dead_code)]
impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `destination` fail.
    pub fn fail_destination(&self, destination: &str) {
        self.failing.lock().unwrap().insert(destination.to_string());
    }

    pub fn sent(&self) -> Vec<(String, SlackPayload)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, p)| p.text).collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, destination: &str, payload: &SlackPayload) -> Result<(), AppError> {
        if self.failing.lock().unwrap().contains(destination) {
            return Err(AppError::Dispatch("HTTP 500: boom".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), payload.clone()));
        Ok(())
    }
}

/// Seen store that fails every call.
#[allow(dead_code)]
pub struct BrokenStore;

#[async_trait]
impl SeenStore for BrokenStore {
    async fn has(&self, _activity_id: u64) -> Result<bool, AppError> {
        Err(AppError::Store("unavailable".to_string()))
    }

    async fn mark_seen(&self, _activity_id: u64) -> Result<bool, AppError> {
        Err(AppError::Store("unavailable".to_string()))
    }
}

/// Seen store that answers lookups but rejects every write.
#[allow(dead_code)]
pub struct ReadOnlyStore;

#[async_trait]
impl SeenStore for ReadOnlyStore {
    async fn has(&self, _activity_id: u64) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn mark_seen(&self, _activity_id: u64) -> Result<bool, AppError> {
        Err(AppError::Store("read-only".to_string()))
    }
}

/// Seen store whose lookups always miss, as if a concurrent cycle had not
/// yet observed the writes. Marks go to the wrapped store.
#[allow(dead_code)]
#[derive(Default)]
pub struct LaggingStore {
    pub inner: MemorySeenStore,
}

#[async_trait]
impl SeenStore for LaggingStore {
    async fn has(&self, _activity_id: u64) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn mark_seen(&self, activity_id: u64) -> Result<bool, AppError> {
        self.inner.mark_seen(activity_id).await
    }
}

#[allow(dead_code)]
pub fn settings(clubs: Vec<Club>) -> PollSettings {
    PollSettings {
        clubs,
        freshness_window: Duration::days(7),
        page_size: 200,
        interval: std::time::Duration::from_secs(300),
        identity: SlackIdentity {
            username: "fitbot".to_string(),
            icon_url: Some("https://example.com/icon.png".to_string()),
        },
    }
}

#[allow(dead_code)]
pub fn poller(
    feed: &Arc<ScriptedFeed>,
    dispatcher: &Arc<RecordingDispatcher>,
    store: Arc<dyn SeenStore>,
    settings: PollSettings,
) -> Poller {
    Poller::new(feed.clone(), dispatcher.clone(), store, settings)
}
