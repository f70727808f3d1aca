//! # Fallback Store Traits
//!
//! Port definition for the store that keeps quote requests whose emails
//! could not be delivered.
//!
//! Implementations:
//!
//! - `json_file`: a pretty-printed JSON array on local disk
//! - `in_memory`: a process-local list for tests
//!
//! # Examples
//!
//! ```ignore
//! use limo_quote::infrastructure::persistence::traits::FallbackStore;
//!
//! async fn pending(store: &impl FallbackStore) {
//!     let records = store.load_all().await.unwrap();
//!     println!("{} requests need manual follow-up", records.len());
//! }
//! ```

use crate::domain::entities::FallbackRecord;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for fallback store operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The storage medium cannot be read or written.
    #[error("Fallback store unavailable at {}: {message}", path.display())]
    StorageUnavailable {
        /// Location of the store.
        path: PathBuf,
        /// Underlying cause.
        message: String,
    },
}

impl RecordError {
    /// Creates a storage unavailable error.
    #[must_use]
    pub fn storage_unavailable(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Returns true if the store could not be reached.
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

/// Result type for fallback store operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// Append-only store of requests awaiting manual follow-up.
#[async_trait]
pub trait FallbackStore: Send + Sync + fmt::Debug {
    /// Appends one record.
    ///
    /// Concurrent appends must not lose records.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::StorageUnavailable` if the record was not
    /// persisted.
    async fn append(&self, record: &FallbackRecord) -> RecordResult<()>;

    /// Returns every stored record in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::StorageUnavailable` if the store cannot be read.
    async fn load_all(&self) -> RecordResult<Vec<FallbackRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_unavailable_display_names_path() {
        let err = RecordError::storage_unavailable("/readonly/pending.json", "permission denied");
        assert!(err.is_storage_unavailable());
        let text = err.to_string();
        assert!(text.contains("/readonly/pending.json"));
        assert!(text.contains("permission denied"));
    }
}
