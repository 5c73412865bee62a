//! In-memory deadline cache
//!
//! Fast `group_id -> deadline_date` lookup shared between the controller
//! (sole writer) and the scheduler (reader at fire time). Mirrors the
//! durable store; the controller keeps the two consistent.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

#[derive(Clone, Debug, Default)]
pub struct DeadlineCache {
    inner: Arc<RwLock<HashMap<i64, NaiveDate>>>,
}

impl DeadlineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, group_id: i64) -> Option<NaiveDate> {
        self.inner.read().await.get(&group_id).copied()
    }

    /// Insert or overwrite, returning the previous value so a failed
    /// persist can roll back.
    pub async fn insert(&self, group_id: i64, deadline_date: NaiveDate) -> Option<NaiveDate> {
        self.inner.write().await.insert(group_id, deadline_date)
    }

    pub async fn remove(&self, group_id: i64) -> Option<NaiveDate> {
        self.inner.write().await.remove(&group_id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
