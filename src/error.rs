// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Every error here is scoped: a club-level fetch failure, a per-activity
//! detail or dispatch failure, or a store failure. None of them is fatal to
//! the poll loop. Startup failures use [`crate::config::ConfigError`].

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Webhook delivery failed: {0}")]
    Dispatch(String),

    #[error("Seen store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message carried by `StravaApi` when Strava answers 429.
    pub const STRAVA_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// Message carried by `StravaApi` when Strava answers 401.
    pub const STRAVA_TOKEN_ERROR: &'static str = "Invalid or expired access token";

    /// True if this is an upstream rate limit response.
    pub fn is_strava_rate_limit(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg == Self::STRAVA_RATE_LIMIT)
    }

    /// True if Strava rejected our access token.
    pub fn is_strava_token_error(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg == Self::STRAVA_TOKEN_ERROR)
    }
}
