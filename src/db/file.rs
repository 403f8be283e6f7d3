// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON file seen store.
//!
//! The whole set is rewritten on every write (temp file + rename), so a mark
//! is durable before `mark_seen` returns. `mark_seen_many` writes once per
//! batch. Writes are serialized by a mutex that is held across the file write.

use super::SeenStore;
use crate::error::AppError;
use crate::models::SeenRecord;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SeenFile {
    #[serde(default)]
    activities: Vec<SeenRecord>,
}

pub struct JsonFileSeenStore {
    path: PathBuf,
    records: Mutex<BTreeMap<u64, SeenRecord>>,
}

impl JsonFileSeenStore {
    /// Open the store at `path`, loading any records already on disk.
    ///
    /// A missing file is an empty store; it is created on the first mark.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file: SeenFile = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Failed to parse seen store {}", path.display()))?;
                file.activities
                    .into_iter()
                    .map(|r| (r.activity_id, r))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Store(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::info!(
            path = %path.display(),
            count = records.len(),
            "Seen store loaded"
        );

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    async fn persist(&self, records: &BTreeMap<u64, SeenRecord>) -> Result<(), AppError> {
        let file = SeenFile {
            activities: records.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&file)
            .map_err(|e| AppError::Store(format!("Failed to serialize seen store: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| AppError::Store(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::Store(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl SeenStore for JsonFileSeenStore {
    async fn has(&self, activity_id: u64) -> Result<bool, AppError> {
        Ok(self.records.lock().await.contains_key(&activity_id))
    }

    async fn mark_seen(&self, activity_id: u64) -> Result<bool, AppError> {
        Ok(!self.mark_seen_many(&[activity_id]).await?.is_empty())
    }

    async fn mark_seen_many(&self, activity_ids: &[u64]) -> Result<Vec<u64>, AppError> {
        let mut records = self.records.lock().await;

        let mut recorded = Vec::new();
        for &activity_id in activity_ids {
            if !records.contains_key(&activity_id) {
                records.insert(activity_id, SeenRecord::now(activity_id));
                recorded.push(activity_id);
            }
        }
        if recorded.is_empty() {
            return Ok(recorded);
        }

        if let Err(e) = self.persist(&records).await {
            // Not committed unless it reached disk.
            for activity_id in &recorded {
                records.remove(activity_id);
            }
            return Err(e);
        }
        Ok(recorded)
    }
}
