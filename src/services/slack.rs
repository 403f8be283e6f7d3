// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Slack incoming-webhook delivery.
//!
//! One POST per notification. No retries: a failed post is reported to the
//! caller, which still marks the activity seen.

use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;

/// Body of a Slack incoming-webhook POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackPayload {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<SlackAttachment>>,
}

/// Image attachment (activity photo).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackAttachment {
    pub fallback: String,
    pub image_url: String,
}

/// Bot name and avatar used on every post.
#[derive(Debug, Clone, Default)]
pub struct SlackIdentity {
    pub username: String,
    pub icon_url: Option<String>,
}

impl SlackIdentity {
    /// Build a payload for `text`, attaching a photo if there is one.
    pub fn payload(&self, text: String, photo_url: Option<&str>) -> SlackPayload {
        let attachments = photo_url.map(|url| {
            vec![SlackAttachment {
                fallback: text.clone(),
                image_url: url.to_string(),
            }]
        });

        SlackPayload {
            username: self.username.clone(),
            icon_url: self.icon_url.clone(),
            text,
            attachments,
        }
    }
}

/// Delivers a notification to a club's destination.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, destination: &str, payload: &SlackPayload) -> Result<(), AppError>;
}

/// Posts payloads to Slack incoming webhooks.
#[derive(Clone, Default)]
pub struct SlackWebhook {
    http: reqwest::Client,
}

impl SlackWebhook {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationDispatcher for SlackWebhook {
    async fn send(&self, destination: &str, payload: &SlackPayload) -> Result<(), AppError> {
        let response = self
            .http
            .post(destination)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::Dispatch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Dispatch(format!("HTTP {}: {}", status, body)));
        }

        tracing::info!(text = %payload.text, "Posted to Slack");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SlackIdentity {
        SlackIdentity {
            username: "fitbot".to_string(),
            icon_url: Some("https://example.com/icon.png".to_string()),
        }
    }

    #[test]
    fn test_payload_without_photo_omits_attachments() {
        let payload = identity().payload("hello".to_string(), None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["username"], "fitbot");
        assert_eq!(json["icon_url"], "https://example.com/icon.png");
        assert_eq!(json["text"], "hello");
        assert!(json.get("attachments").is_none());
    }

    #[test]
    fn test_payload_with_photo() {
        let payload = identity().payload("hello".to_string(), Some("https://img/1.jpg"));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["attachments"][0]["image_url"], "https://img/1.jpg");
        assert_eq!(json["attachments"][0]["fallback"], "hello");
    }

    #[test]
    fn test_missing_icon_is_omitted() {
        let identity = SlackIdentity {
            username: "fitbot".to_string(),
            icon_url: None,
        };
        let json = serde_json::to_value(identity.payload("x".to_string(), None)).unwrap();
        assert!(json.get("icon_url").is_none());
    }
}
