//! Mentor (someone who already relocated) model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use raze_core::types::{DbId, Timestamp};

/// A row from the `mentors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Mentor {
    pub id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country_code: String,
    pub relocated_at: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMentor {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(equal = 2, message = "country_code must be a two-letter code"))]
    pub country_code: String,
    pub relocated_at: Option<NaiveDate>,
    #[validate(url)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMentor {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(equal = 2, message = "country_code must be a two-letter code"))]
    pub country_code: Option<String>,
    pub relocated_at: Option<NaiveDate>,
    #[validate(url)]
    pub image_url: Option<String>,
}
