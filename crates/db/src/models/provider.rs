//! Relocation service provider model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use raze_core::types::{DbId, Timestamp};

/// A row from the `providers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Provider {
    pub id: DbId,
    pub name: String,
    pub provider_type: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    /// Country codes the provider serves.
    pub countries: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a provider.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProvider {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "provider_type must not be empty"))]
    pub provider_type: String,
    #[validate(url)]
    pub website: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub countries: Vec<String>,
}

/// DTO for updating a provider. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProvider {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub provider_type: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub countries: Option<Vec<String>>,
}
