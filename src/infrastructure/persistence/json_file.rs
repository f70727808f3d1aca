//! # JSON File Fallback Store
//!
//! Keeps fallback records in a single pretty-printed JSON array on disk.
//!
//! Every append reads the whole array, pushes the record and writes the
//! array back through a temporary sibling file that is synced to disk and
//! renamed over the store. The read-modify-write cycle runs under an async
//! mutex, so appends from concurrent requests on one store instance never
//! overwrite each other.
//!
//! A store file that does not hold a JSON array is renamed to
//! `<name>.corrupt-<millis>` and a fresh array is started.

use crate::domain::entities::FallbackRecord;
use crate::infrastructure::persistence::traits::{FallbackStore, RecordError, RecordResult};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// [`FallbackStore`] backed by a JSON array file.
#[derive(Debug, Clone)]
pub struct JsonFileFallbackStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileFallbackStore {
    /// Creates a store at the given path. Nothing is touched until the first
    /// append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the store location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, error: impl ToString) -> RecordError {
        RecordError::storage_unavailable(&self.path, error.to_string())
    }

    async fn ensure_parent_dir(&self) -> RecordResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| self.unavailable(e)),
            _ => Ok(()),
        }
    }

    /// Reads the raw file, treating a missing file as empty.
    async fn read_raw(&self) -> RecordResult<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.unavailable(e)),
        }
    }

    /// Reads the current entries for an append, quarantining a corrupt file.
    async fn read_entries_for_append(&self) -> RecordResult<Vec<Value>> {
        let Some(contents) = self.read_raw().await? else {
            return Ok(Vec::new());
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Value>>(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let quarantine = self.quarantine_path();
                fs::rename(&self.path, &quarantine)
                    .await
                    .map_err(|e| self.unavailable(e))?;
                warn!(
                    path = %self.path.display(),
                    quarantined_to = %quarantine.display(),
                    error = %e,
                    "fallback store was not a JSON array, starting a new one"
                );
                Ok(Vec::new())
            }
        }
    }

    fn quarantine_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".corrupt-{}", Utc::now().timestamp_millis()));
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = std::ffi::OsString::from(".");
        if let Some(file_name) = self.path.file_name() {
            name.push(file_name);
        }
        name.push(format!(".{}.tmp", Uuid::new_v4()));
        self.path.with_file_name(name)
    }

    /// Writes the entries to a temporary sibling, flushes it to disk and
    /// renames it over the store.
    async fn write_entries(&self, entries: &[Value]) -> RecordResult<()> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| self.unavailable(e))?;
        let temp = self.temp_path();

        if let Err(e) = write_synced(&temp, json.as_bytes()).await {
            let _ = fs::remove_file(&temp).await;
            return Err(self.unavailable(e));
        }
        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(self.unavailable(e));
        }
        Ok(())
    }
}

/// Writes `contents` to a new file and waits until it reaches the disk.
async fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

#[async_trait]
impl FallbackStore for JsonFileFallbackStore {
    async fn append(&self, record: &FallbackRecord) -> RecordResult<()> {
        let entry = serde_json::to_value(record).map_err(|e| self.unavailable(e))?;

        let _guard = self.lock.lock().await;
        self.ensure_parent_dir().await?;

        let mut entries = self.read_entries_for_append().await?;
        entries.push(entry);
        self.write_entries(&entries).await?;

        debug!(
            booking_id = %record.booking_id,
            path = %self.path.display(),
            total = entries.len(),
            "fallback record appended"
        );
        Ok(())
    }

    async fn load_all(&self) -> RecordResult<Vec<FallbackRecord>> {
        let _guard = self.lock.lock().await;

        let Some(contents) = self.read_raw().await? else {
            return Ok(Vec::new());
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<Value> = serde_json::from_str(&contents)
            .map_err(|e| self.unavailable(format!("not a JSON array: {e}")))?;

        let records = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable fallback record");
                    None
                }
            })
            .collect();
        Ok(records)
    }
}
