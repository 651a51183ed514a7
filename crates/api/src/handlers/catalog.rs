//! Lookup endpoints used by the wizard's pickers.

use axum::extract::{Query, State};
use axum::Json;
use raze_core::catalog::{search_professions, CatalogProfession};
use raze_db::models::country::CountryRow;
use raze_db::repositories::CountryRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfessionQuery {
    /// Case-insensitive name filter.
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/countries
pub async fn list_countries(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CountryRow>>>> {
    let countries = CountryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: countries }))
}

/// GET /api/v1/professions
///
/// The `other` entry is always present so a custom name can be entered.
pub async fn list_professions(
    Query(query): Query<ProfessionQuery>,
) -> Json<DataResponse<Vec<CatalogProfession>>> {
    Json(DataResponse {
        data: search_professions(&query.q),
    })
}
