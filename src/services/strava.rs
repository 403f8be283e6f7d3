// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for club activity feeds.
//!
//! Handles:
//! - Listing recent activities for a club
//! - Fetching activity details (photos) before posting
//! - Rate limit and token error detection

use crate::error::AppError;
use crate::models::{Activity, ActivitySummary};
use async_trait::async_trait;
use serde::Deserialize;

/// Default Strava API base URL.
pub const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";

/// Source of club activities.
#[async_trait]
pub trait ActivityFeed: Send + Sync {
    /// Most recent activities for a club, newest first.
    async fn list_club_activities(
        &self,
        club_id: u64,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError>;

    /// Detailed activity by ID.
    async fn get_activity(&self, activity_id: u64) -> Result<Activity, AppError>;
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl StravaClient {
    /// Create a new Strava client using a long-lived access token.
    pub fn new(access_token: String) -> Self {
        Self::with_base_url(access_token, STRAVA_API_BASE.to_string())
    }

    /// Create a client against a different API root (local mocks).
    pub fn with_base_url(access_token: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl ActivityFeed for StravaClient {
    async fn list_club_activities(
        &self,
        club_id: u64,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let url = format!("{}/clubs/{}/activities", self.base_url, club_id);
        self.get_json(&url, &[("per_page", per_page.to_string())])
            .await
    }

    async fn get_activity(&self, activity_id: u64) -> Result<Activity, AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        self.get_json(&url, &[]).await
    }
}
