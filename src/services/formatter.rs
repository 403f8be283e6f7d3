// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification text for a posted activity.
//!
//! Output looks like:
//! `A.lice S.mith rode 10.5 miles! :bike: Morning Ride :bike: <https://www.strava.com/activities/42>`

use crate::models::{Activity, ActivityType, Athlete};

const METERS_TO_MILES: f64 = 0.00062137;

/// Base URL for public activity links.
pub const ACTIVITY_URL_BASE: &str = "https://www.strava.com/activities";

/// Past-tense verb for an activity type; unmapped types use the type name.
pub fn verb_for(activity_type: &ActivityType) -> &str {
    match activity_type {
        ActivityType::Ride => "rode",
        ActivityType::Run => "ran",
        ActivityType::Swim => "swam",
        ActivityType::Other(name) => name,
    }
}

/// Slack emoji for an activity type; unmapped types get none.
pub fn emoji_for(activity_type: &ActivityType) -> &'static str {
    match activity_type {
        ActivityType::Ride => ":bike:",
        ActivityType::Run => ":runner:",
        ActivityType::Swim => ":swimmer:",
        ActivityType::Other(_) => "",
    }
}

/// Convert meters to miles, rounded to two decimal places.
pub fn meters_to_miles(meters: f64) -> f64 {
    (meters * METERS_TO_MILES * 100.0).round() / 100.0
}

/// Break up a name so it doesn't ping the person in Slack: "Alice" -> "A.lice".
///
/// Names of one character or less are returned as-is.
pub fn ding_protect(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if name.chars().count() > 1 => format!("{}.{}", first, chars.as_str()),
        _ => name.to_string(),
    }
}

/// Slack-formatted link to the activity on Strava.
pub fn activity_link(activity_id: u64) -> String {
    format!("<{}/{}>", ACTIVITY_URL_BASE, activity_id)
}

/// Build the notification message for an athlete's activity.
pub fn format_activity(athlete: &Athlete, activity: &Activity) -> String {
    let who = format!(
        "{} {}",
        ding_protect(&athlete.firstname),
        ding_protect(&athlete.lastname)
    );
    let verb = verb_for(&activity.activity_type);
    let miles = meters_to_miles(activity.distance.max(0.0));
    let emoji = emoji_for(&activity.activity_type);

    format!(
        "{} {} {} miles! {} {} {} {}",
        who,
        verb,
        miles,
        emoji,
        activity.name,
        emoji,
        activity_link(activity.id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn athlete(first: &str, last: &str) -> Athlete {
        Athlete {
            id: Some(1),
            firstname: first.to_string(),
            lastname: last.to_string(),
        }
    }

    fn activity(activity_type: ActivityType, distance: f64) -> Activity {
        Activity {
            id: 42,
            name: "Morning Workout".to_string(),
            activity_type,
            distance,
            start_date: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            commute: false,
            photos: None,
        }
    }

    #[test]
    fn test_ding_protect() {
        assert_eq!(ding_protect("Alice"), "A.lice");
        assert_eq!(ding_protect("Al"), "A.l");
        assert_eq!(ding_protect("A"), "A");
        assert_eq!(ding_protect(""), "");
    }

    #[test]
    fn test_ding_protect_multibyte() {
        assert_eq!(ding_protect("Élodie"), "É.lodie");
        assert_eq!(ding_protect("É"), "É");
    }

    #[test]
    fn test_meters_to_miles() {
        assert_eq!(meters_to_miles(1609.34), 1.0);
        assert_eq!(meters_to_miles(0.0), 0.0);
        assert_eq!(meters_to_miles(16093.4), 10.0);
        assert_eq!(meters_to_miles(5000.0), 3.11);
    }

    #[test]
    fn test_verb_and_emoji_fallback() {
        let kayak = ActivityType::Other("Kayaking".to_string());
        assert_eq!(verb_for(&kayak), "Kayaking");
        assert_eq!(emoji_for(&kayak), "");
        assert_eq!(verb_for(&ActivityType::Swim), "swam");
        assert_eq!(emoji_for(&ActivityType::Run), ":runner:");
    }

    #[test]
    fn test_format_ride() {
        let message = format_activity(
            &athlete("Alice", "Smith"),
            &activity(ActivityType::Ride, 16093.4),
        );
        assert_eq!(
            message,
            "A.lice S.mith rode 10 miles! :bike: Morning Workout :bike: <https://www.strava.com/activities/42>"
        );
    }

    #[test]
    fn test_format_fractional_miles() {
        let message = format_activity(
            &athlete("Bob", "J."),
            &activity(ActivityType::Run, 5000.0),
        );
        assert_eq!(
            message,
            "B.ob J.. ran 3.11 miles! :runner: Morning Workout :runner: <https://www.strava.com/activities/42>"
        );
    }

    #[test]
    fn test_format_unmapped_type() {
        let message = format_activity(
            &athlete("C", ""),
            &activity(ActivityType::Other("Yoga".to_string()), 0.0),
        );
        assert_eq!(
            message,
            "C  Yoga 0 miles!  Morning Workout  <https://www.strava.com/activities/42>"
        );
    }
}
