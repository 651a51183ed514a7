//! Per-country relocation step model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use raze_core::types::{DbId, Timestamp};

/// A row from the `country_steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CountryStep {
    pub id: DbId,
    pub country_code: String,
    pub title: String,
    pub description: String,
    pub sort_order: i32,
    /// May reference a provider that has since been deleted.
    pub provider_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending a step. Title and description start empty when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCountryStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub provider_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCountryStep {
    pub title: Option<String>,
    pub description: Option<String>,
    pub provider_id: Option<DbId>,
}

/// Move one step within its country's list.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReorderCountrySteps {
    pub from_index: usize,
    pub to_index: usize,
}
