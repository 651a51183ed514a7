use serde::Serialize;
use sqlx::FromRow;

/// A row from the `countries` lookup table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CountryRow {
    pub code: String,
    pub name: String,
}
