// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitbot: relay Strava club activities to Slack
//!
//! This crate polls Strava club activity feeds, decides which activities
//! are new, and posts a short message for each one to the club's Slack
//! webhook. Every activity is handled at most once.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use config::{Config, SeenStoreKind};
use db::{FirestoreSeenStore, JsonFileSeenStore, MemorySeenStore, SeenStore};
use error::AppError;
use services::{Poller, SlackWebhook, StravaClient};
use std::sync::Arc;

/// Open the seen store selected by the config.
pub async fn open_seen_store(config: &Config) -> Result<Arc<dyn SeenStore>, AppError> {
    let store: Arc<dyn SeenStore> = match config.seen_store {
        SeenStoreKind::Memory => Arc::new(MemorySeenStore::new()),
        SeenStoreKind::File => Arc::new(JsonFileSeenStore::open(&config.seen_store_path).await?),
        SeenStoreKind::Firestore => {
            Arc::new(FirestoreSeenStore::new(&config.gcp_project_id).await?)
        }
    };
    Ok(store)
}

/// Wire the production Strava client and Slack webhook into a poller.
pub fn build_poller(config: &Config, store: Arc<dyn SeenStore>) -> Poller {
    let feed = StravaClient::with_base_url(
        config.strava_access_token.clone(),
        config.strava_api_base.clone(),
    );

    Poller::new(
        Arc::new(feed),
        Arc::new(SlackWebhook::new()),
        store,
        config.poll_settings(),
    )
}
