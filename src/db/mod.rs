// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Seen-activity storage.
//!
//! The poller only needs a grow-only set of activity IDs. Three backends:
//! in-memory (tests, ephemeral runs), a JSON file (single host), and
//! Firestore.

pub mod file;
pub mod firestore;
pub mod memory;

pub use file::JsonFileSeenStore;
pub use firestore::FirestoreSeenStore;
pub use memory::MemorySeenStore;

use crate::error::AppError;
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const SEEN_ACTIVITIES: &str = "seen_activities";
}

/// Set of activity IDs that have already been processed.
///
/// Implementations must be safe to share across tasks. A `mark_seen` that
/// returns `Ok` must be visible to every later `has` for the same ID, and
/// marking an ID twice is a no-op.
#[async_trait]
pub trait SeenStore: Send + Sync {
    async fn has(&self, activity_id: u64) -> Result<bool, AppError>;

    /// Record an ID. Returns `true` only for the call that first recorded it.
    async fn mark_seen(&self, activity_id: u64) -> Result<bool, AppError>;

    /// Record several IDs, returning the ones this call recorded first.
    async fn mark_seen_many(&self, activity_ids: &[u64]) -> Result<Vec<u64>, AppError> {
        let mut recorded = Vec::new();
        for &activity_id in activity_ids {
            if self.mark_seen(activity_id).await? {
                recorded.push(activity_id);
            }
        }
        Ok(recorded)
    }
}
