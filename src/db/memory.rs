// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory seen store. Contents live for the process lifetime only.

use super::SeenStore;
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct MemorySeenStore {
    ids: DashSet<u64>,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with already-seen IDs.
    pub fn with_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        let store = Self::new();
        for id in ids {
            store.ids.insert(id);
        }
        store
    }

    pub fn contains(&self, activity_id: u64) -> bool {
        self.ids.contains(&activity_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn has(&self, activity_id: u64) -> Result<bool, AppError> {
        Ok(self.ids.contains(&activity_id))
    }

    async fn mark_seen(&self, activity_id: u64) -> Result<bool, AppError> {
        Ok(self.ids.insert(activity_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mark_then_has() {
        let store = MemorySeenStore::new();
        assert!(!store.has(1).await.unwrap());

        store.mark_seen(1).await.unwrap();
        assert!(store.has(1).await.unwrap());
        assert!(!store.has(2).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_seen_is_idempotent() {
        let store = MemorySeenStore::new();
        assert!(store.mark_seen(5).await.unwrap());
        assert!(!store.mark_seen(5).await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_seen_many_reports_new_ids() {
        let store = MemorySeenStore::with_ids([2]);
        let recorded = store.mark_seen_many(&[1, 2, 3, 1]).await.unwrap();
        assert_eq!(recorded, vec![1, 3]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_marks() {
        let store = std::sync::Arc::new(MemorySeenStore::new());
        let mut handles = vec![];
        for i in 0..50u64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.mark_seen(i % 10).await.unwrap()
            }));
        }
        let mut first_marks = 0;
        for handle in handles {
            if handle.await.unwrap() {
                first_marks += 1;
            }
        }
        assert_eq!(store.len(), 10);
        assert_eq!(first_marks, 10);
    }
}
