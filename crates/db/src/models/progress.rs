//! Wizard progress row.

use serde::Serialize;
use sqlx::FromRow;
use raze_core::form::FormData;
use raze_core::progress::SavedProgress;
use raze_core::types::{DbId, Timestamp};

/// A row from the `user_progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProgress {
    pub id: DbId,
    pub identity_id: DbId,
    pub current_step: i32,
    pub form_data: serde_json::Value,
    pub path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UserProgress> for SavedProgress {
    fn from(row: UserProgress) -> Self {
        SavedProgress {
            current_step: row.current_step,
            form_data: FormData::from_json_lossy(&row.form_data),
            path: row.path,
            updated_at: Some(row.updated_at),
        }
    }
}
