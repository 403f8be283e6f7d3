// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity models as returned by the club feed and detail endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Activity type names that count as cycling for the commute rule.
pub const CYCLING_TYPES: &[&str] = &[
    "Ride",
    "Bike",
    "EBikeRide",
    "VirtualRide",
    "MountainBikeRide",
    "GravelRide",
    "EMountainBikeRide",
    "Handcycle",
    "Velomobile",
];

/// Activity type. Anything Strava reports beyond the three core sports is
/// carried through verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Ride,
    Run,
    Swim,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Ride => "Ride",
            ActivityType::Run => "Run",
            ActivityType::Swim => "Swim",
            ActivityType::Other(name) => name,
        }
    }

    pub fn is_cycling(&self) -> bool {
        CYCLING_TYPES.contains(&self.as_str())
    }
}

impl From<&str> for ActivityType {
    fn from(name: &str) -> Self {
        match name {
            "Ride" => ActivityType::Ride,
            "Run" => ActivityType::Run,
            "Swim" => ActivityType::Swim,
            other => ActivityType::Other(other.to_string()),
        }
    }
}

impl Serialize for ActivityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ActivityType::from(name.as_str()))
    }
}

/// Athlete as embedded in club activity summaries.
///
/// Strava already abbreviates the last name in club feeds; we redact further
/// before display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Athlete {
    /// Strava athlete ID, when the feed exposes it
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

/// Summary activity from the club activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub commute: bool,
    pub athlete: Athlete,
}

/// Detailed activity, fetched to enrich a summary before posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub commute: bool,
    #[serde(default)]
    pub photos: Option<ActivityPhotos>,
}

impl Activity {
    /// URL of the primary photo at the largest size Strava offers.
    pub fn primary_photo_url(&self) -> Option<&str> {
        self.photos.as_ref()?.primary.as_ref()?.largest_url()
    }
}

/// Photo metadata attached to a detailed activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityPhotos {
    #[serde(default)]
    pub primary: Option<PrimaryPhoto>,
    #[serde(default)]
    pub count: u32,
}

/// Primary photo; `urls` is keyed by pixel size ("100", "600", ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrimaryPhoto {
    #[serde(default)]
    pub urls: HashMap<String, String>,
}

impl PrimaryPhoto {
    pub fn largest_url(&self) -> Option<&str> {
        self.urls
            .iter()
            .max_by_key(|(size, _)| size.parse::<u32>().unwrap_or(0))
            .map(|(_, url)| url.as_str())
    }
}
