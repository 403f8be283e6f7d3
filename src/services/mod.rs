// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod filter;
pub mod formatter;
pub mod poller;
pub mod slack;
pub mod strava;

pub use filter::{ActivityFilter, Classification, Partition};
pub use poller::{ClubOutcome, ClubReport, CycleMode, CycleReport, PollSettings, Poller};
pub use slack::{NotificationDispatcher, SlackIdentity, SlackPayload, SlackWebhook};
pub use strava::{ActivityFeed, StravaClient};
