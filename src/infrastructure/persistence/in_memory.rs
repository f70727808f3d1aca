//! # In-Memory Fallback Store
//!
//! In-memory implementation of [`FallbackStore`] for testing.
//!
//! Records live in a shared `Vec`, so clones of one store see the same data.
//! The store can be switched into a failing mode to exercise the path where
//! both delivery and recording fail.

use crate::domain::entities::FallbackRecord;
use crate::infrastructure::persistence::traits::{FallbackStore, RecordError, RecordResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory implementation of [`FallbackStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryFallbackStore {
    records: Arc<RwLock<Vec<FallbackRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryFallbackStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose every operation fails with
    /// `RecordError::StorageUnavailable`.
    #[must_use]
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_unavailable(true);
        store
    }

    /// Switches the failing mode on or off.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of records in the store, waiting for any
    /// in-flight append.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes all records.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }

    fn check_available(&self) -> RecordResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RecordError::storage_unavailable(
                "memory",
                "store is marked unavailable",
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FallbackStore for InMemoryFallbackStore {
    async fn append(&self, record: &FallbackRecord) -> RecordResult<()> {
        self.check_available()?;
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn load_all(&self) -> RecordResult<Vec<FallbackRecord>> {
        self.check_available()?;
        Ok(self.records.read().await.clone())
    }
}
