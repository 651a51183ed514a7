//! Progress persistence adapter.
//!
//! [`ProgressStore`] is the seam to whatever holds the one-row-per-identity
//! progress record (PostgreSQL in production, [`MemoryProgressStore`] in
//! tests). [`ProgressAdapter`] wraps a store with the failure policy the
//! wizard relies on: reads degrade to empty progress, writes report a plain
//! success flag, and every store error is logged where it happens.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use crate::form::FormData;
use crate::types::{DbId, Timestamp};

/// A saved wizard position for one identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedProgress {
    pub current_step: i32,
    pub form_data: FormData,
    pub path: Option<String>,
    pub updated_at: Option<Timestamp>,
}

impl SavedProgress {
    /// What `load` returns when nothing has been saved yet.
    pub fn empty() -> Self {
        Self {
            current_step: 0,
            form_data: FormData::default(),
            path: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressStoreError {
    #[error("progress store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Storage for progress rows keyed by identity.
///
/// Writes are upserts: the first save creates the row, later saves
/// overwrite it. Concurrent writers are last-write-wins.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn fetch(&self, identity_id: DbId) -> Result<Option<SavedProgress>, ProgressStoreError>;

    async fn upsert(
        &self,
        identity_id: DbId,
        current_step: i32,
        form_data: &FormData,
    ) -> Result<(), ProgressStoreError>;

    async fn upsert_path(&self, identity_id: DbId, path: &str) -> Result<(), ProgressStoreError>;
}

/// Failure policy around a [`ProgressStore`].
#[derive(Clone, Copy)]
pub struct ProgressAdapter<'a> {
    store: &'a dyn ProgressStore,
}

impl<'a> ProgressAdapter<'a> {
    pub fn new(store: &'a dyn ProgressStore) -> Self {
        Self { store }
    }

    /// Load saved progress; "none found" and read errors both yield
    /// [`SavedProgress::empty`].
    pub async fn load(&self, identity_id: DbId) -> SavedProgress {
        match self.store.fetch(identity_id).await {
            Ok(Some(progress)) => progress,
            Ok(None) => SavedProgress::empty(),
            Err(e) => {
                tracing::error!(identity_id, error = %e, "Error loading user progress");
                SavedProgress::empty()
            }
        }
    }

    /// Persist `(step, data)` for the identity. Negative steps are stored as 0.
    pub async fn save(&self, identity_id: DbId, step: i32, form_data: &FormData) -> bool {
        match self.store.upsert(identity_id, step.max(0), form_data).await {
            Ok(()) => {
                tracing::debug!(identity_id, step, "User progress saved");
                true
            }
            Err(e) => {
                tracing::error!(identity_id, step, error = %e, "Error saving user progress");
                false
            }
        }
    }

    pub async fn save_path(&self, identity_id: DbId, path: &str) -> bool {
        match self.store.upsert_path(identity_id, path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(identity_id, path, error = %e, "Error saving last path");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local [`ProgressStore`] with switchable write failures.
#[derive(Default)]
pub struct MemoryProgressStore {
    rows: Mutex<HashMap<DbId, SavedProgress>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<DbId, SavedProgress>>, ProgressStoreError> {
        self.rows
            .lock()
            .map_err(|_| ProgressStoreError::Unavailable("memory store poisoned".into()))
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn fetch(&self, identity_id: DbId) -> Result<Option<SavedProgress>, ProgressStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ProgressStoreError::Unavailable("reads disabled".into()));
        }
        Ok(self.lock()?.get(&identity_id).cloned())
    }

    async fn upsert(
        &self,
        identity_id: DbId,
        current_step: i32,
        form_data: &FormData,
    ) -> Result<(), ProgressStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ProgressStoreError::Unavailable("writes disabled".into()));
        }
        let mut rows = self.lock()?;
        let row = rows.entry(identity_id).or_insert_with(SavedProgress::empty);
        row.current_step = current_step;
        row.form_data = form_data.clone();
        row.updated_at = Some(chrono::Utc::now());
        Ok(())
    }

    async fn upsert_path(&self, identity_id: DbId, path: &str) -> Result<(), ProgressStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ProgressStoreError::Unavailable("writes disabled".into()));
        }
        let mut rows = self.lock()?;
        let row = rows.entry(identity_id).or_insert_with(SavedProgress::empty);
        row.path = Some(path.to_string());
        row.updated_at = Some(chrono::Utc::now());
        Ok(())
    }
}
