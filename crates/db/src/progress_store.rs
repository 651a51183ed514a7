//! PostgreSQL-backed [`ProgressStore`].

use async_trait::async_trait;
use sqlx::PgPool;
use raze_core::form::FormData;
use raze_core::progress::{ProgressStore, ProgressStoreError, SavedProgress};
use raze_core::types::DbId;

use crate::repositories::ProgressRepo;

/// Progress store over the `user_progress` table.
#[derive(Clone)]
pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(e: sqlx::Error) -> ProgressStoreError {
    ProgressStoreError::Backend(Box::new(e))
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn fetch(&self, identity_id: DbId) -> Result<Option<SavedProgress>, ProgressStoreError> {
        let row = ProgressRepo::find_by_identity(&self.pool, identity_id)
            .await
            .map_err(backend)?;
        tracing::debug!(identity_id, found = row.is_some(), "Fetched progress row");
        Ok(row.map(SavedProgress::from))
    }

    async fn upsert(
        &self,
        identity_id: DbId,
        current_step: i32,
        form_data: &FormData,
    ) -> Result<(), ProgressStoreError> {
        ProgressRepo::upsert(&self.pool, identity_id, current_step, &form_data.to_json())
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn upsert_path(&self, identity_id: DbId, path: &str) -> Result<(), ProgressStoreError> {
        ProgressRepo::upsert_path(&self.pool, identity_id, path)
            .await
            .map_err(backend)?;
        tracing::debug!(identity_id, path, "Upserted last path");
        Ok(())
    }
}
