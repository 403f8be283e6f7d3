// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables and the
//! clubs file.
//!
//! Configuration is read once at startup; any error here is fatal.

use crate::models::Club;
use crate::services::strava::STRAVA_API_BASE;
use crate::services::{PollSettings, SlackIdentity};
use std::env;
use std::path::{Path, PathBuf};

/// Which seen store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeenStoreKind {
    Memory,
    File,
    Firestore,
}

impl SeenStoreKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "file" => Some(Self::File),
            "firestore" => Some(Self::Firestore),
            _ => None,
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava API access token
    pub strava_access_token: String,
    /// Strava API root (overridable for testing)
    pub strava_api_base: String,
    /// Clubs to relay
    pub clubs: Vec<Club>,
    /// Slack bot display name
    pub slack_username: String,
    /// Slack bot avatar
    pub slack_icon_url: Option<String>,
    /// Seconds between poll cycles
    pub poll_interval_secs: u64,
    /// Activities older than this are never posted
    pub freshness_window_days: i64,
    /// Activities requested per club per cycle
    pub page_size: u32,
    /// Seen store backend
    pub seen_store: SeenStoreKind,
    /// Path for the file seen store
    pub seen_store_path: PathBuf,
    /// GCP project ID (Firestore seen store)
    pub gcp_project_id: String,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            strava_access_token: "test_token".to_string(),
            strava_api_base: STRAVA_API_BASE.to_string(),
            clubs: vec![Club {
                id: 1,
                webhook: "http://localhost:9/hook".to_string(),
                blocklist: Default::default(),
            }],
            slack_username: "fitbot".to_string(),
            slack_icon_url: None,
            poll_interval_secs: 300,
            freshness_window_days: 7,
            page_size: 200,
            seen_store: SeenStoreKind::Memory,
            seen_store_path: PathBuf::from("seen.json"),
            gcp_project_id: "test-project".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let clubs_file = var("CLUBS_FILE").unwrap_or_else(|| "clubs.json".to_string());
        let clubs = load_clubs(Path::new(&clubs_file))?;

        Ok(Self {
            strava_access_token: var("STRAVA_ACCESS_TOKEN")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("STRAVA_ACCESS_TOKEN"))?,
            strava_api_base: var("STRAVA_API_BASE").unwrap_or_else(|| STRAVA_API_BASE.to_string()),
            clubs,
            slack_username: var("SLACK_USERNAME").unwrap_or_else(|| "fitbot".to_string()),
            slack_icon_url: var("SLACK_ICON_URL").filter(|v| !v.is_empty()),
            poll_interval_secs: parse_positive(&var, "POLL_INTERVAL_SECS", 300)?,
            freshness_window_days: parse_positive(&var, "FRESHNESS_WINDOW_DAYS", 7)?,
            page_size: parse_positive(&var, "PAGE_SIZE", 200)?,
            seen_store: match var("SEEN_STORE") {
                Some(value) => SeenStoreKind::parse(&value).ok_or(ConfigError::Invalid {
                    key: "SEEN_STORE",
                    value,
                })?,
                None => SeenStoreKind::File,
            },
            seen_store_path: var("SEEN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("seen.json")),
            gcp_project_id: var("GCP_PROJECT_ID").unwrap_or_else(|| "local-dev".to_string()),
        })
    }

    /// Poller settings derived from this config.
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            clubs: self.clubs.clone(),
            freshness_window: chrono::Duration::days(self.freshness_window_days),
            page_size: self.page_size,
            interval: std::time::Duration::from_secs(self.poll_interval_secs),
            identity: SlackIdentity {
                username: self.slack_username.clone(),
                icon_url: self.slack_icon_url.clone(),
            },
        }
    }
}

/// Read the clubs file: a JSON array of `{ id, webhook, blocklist? }`.
pub fn load_clubs(path: &Path) -> Result<Vec<Club>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let clubs: Vec<Club> =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if clubs.is_empty() {
        return Err(ConfigError::NoClubs);
    }
    Ok(clubs)
}

fn parse_positive<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(value) = var(key) else {
        return Ok(default);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No clubs configured")]
    NoClubs,
}
