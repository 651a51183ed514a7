//! Repository for the `user_progress` table.

use sqlx::PgPool;
use raze_core::types::DbId;

use crate::models::progress::UserProgress;

const COLUMNS: &str = "id, identity_id, current_step, form_data, path, created_at, updated_at";

pub struct ProgressRepo;

impl ProgressRepo {
    pub async fn find_by_identity(
        pool: &PgPool,
        identity_id: DbId,
    ) -> Result<Option<UserProgress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_progress WHERE identity_id = $1");
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(identity_id)
            .fetch_optional(pool)
            .await
    }

    /// Save step and form data, creating the row on first save.
    ///
    /// Uses `ON CONFLICT (identity_id) DO UPDATE` to guarantee one row per
    /// identity. The stored `path` is left untouched.
    pub async fn upsert(
        pool: &PgPool,
        identity_id: DbId,
        current_step: i32,
        form_data: &serde_json::Value,
    ) -> Result<UserProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_progress (identity_id, current_step, form_data) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (identity_id) DO UPDATE \
             SET current_step = EXCLUDED.current_step, \
                 form_data = EXCLUDED.form_data \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(identity_id)
            .bind(current_step)
            .bind(form_data)
            .fetch_one(pool)
            .await
    }

    /// Record the last-known navigation path without touching step or data.
    pub async fn upsert_path(
        pool: &PgPool,
        identity_id: DbId,
        path: &str,
    ) -> Result<UserProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_progress (identity_id, path) \
             VALUES ($1, $2) \
             ON CONFLICT (identity_id) DO UPDATE \
             SET path = EXCLUDED.path \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(identity_id)
            .bind(path)
            .fetch_one(pool)
            .await
    }
}
