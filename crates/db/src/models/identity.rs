//! Identity entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use raze_core::types::{DbId, Timestamp};

/// A row from the `identities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Identity {
    pub id: DbId,
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a sign-in from the external provider.
#[derive(Debug, Clone)]
pub struct UpsertIdentity {
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
}
