//! Expat community model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use raze_core::types::{DbId, Timestamp};

/// A row from the `communities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Community {
    pub id: DbId,
    pub name: String,
    /// Where the community lives, e.g. `"Facebook"`, `"Discord"`.
    pub platform: String,
    pub url: String,
    pub members_count: Option<i32>,
    pub country_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommunity {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "platform must not be empty"))]
    pub platform: String,
    #[validate(url)]
    pub url: String,
    #[validate(range(min = 0))]
    pub members_count: Option<i32>,
    #[validate(length(equal = 2, message = "country_code must be a two-letter code"))]
    pub country_code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommunity {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub platform: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    #[validate(range(min = 0))]
    pub members_count: Option<i32>,
    #[validate(length(equal = 2, message = "country_code must be a two-letter code"))]
    pub country_code: Option<String>,
}
