// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore seen store.
//!
//! One document per activity in the `seen_activities` collection, keyed by
//! the Strava activity ID.

use super::{collections, SeenStore};
use crate::error::AppError;
use crate::models::SeenRecord;
use async_trait::async_trait;

/// Firestore-backed seen store.
#[derive(Clone)]
pub struct FirestoreSeenStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreSeenStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Store(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Store(format!("Failed to connect to Firestore Emulator: {}", e)))?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline store for testing. Every operation returns an error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Store("Database not connected (offline mode)".to_string()))
    }

    /// Fetch the stored record for an activity, if any.
    pub async fn get_record(&self, activity_id: u64) -> Result<Option<SeenRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SEEN_ACTIVITIES)
            .obj()
            .one(&activity_id.to_string())
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }
}

#[async_trait]
impl SeenStore for FirestoreSeenStore {
    async fn has(&self, activity_id: u64) -> Result<bool, AppError> {
        Ok(self.get_record(activity_id).await?.is_some())
    }

    async fn mark_seen(&self, activity_id: u64) -> Result<bool, AppError> {
        // Records are never rewritten; keep the first seen_at.
        if self.has(activity_id).await? {
            return Ok(false);
        }

        let record = SeenRecord::now(activity_id);
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SEEN_ACTIVITIES)
            .document_id(activity_id.to_string())
            .object(&record)
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(true)
    }
}
