//! Admin handlers for the ordered per-country relocation steps.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use raze_core::error::CoreError;
use raze_core::ordering::{dense_sort_orders, reorder};
use raze_core::types::DbId;
use raze_db::models::country_step::{CreateCountryStep, ReorderCountrySteps, UpdateCountryStep};
use raze_db::repositories::{CountryRepo, CountryStepRepo};
use raze_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Normalize a path country code and check it exists.
async fn known_country(pool: &DbPool, code: &str) -> AppResult<String> {
    let code = code.trim().to_ascii_uppercase();
    if !CountryRepo::exists(pool, &code).await? {
        return Err(AppError::NotFound(format!("Country {code} not found")));
    }
    Ok(code)
}

/// GET /api/v1/admin/countries/{code}/steps
pub async fn list_steps(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let code = known_country(&state.pool, &code).await?;
    let steps = CountryStepRepo::list_by_country(&state.pool, &code).await?;

    Ok(Json(DataResponse { data: steps }))
}

/// POST /api/v1/admin/countries/{code}/steps
///
/// Append a step after the country's existing steps.
pub async fn create_step(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<CreateCountryStep>,
) -> AppResult<impl IntoResponse> {
    let code = known_country(&state.pool, &code).await?;
    let step = CountryStepRepo::create(&state.pool, &code, &input).await?;

    tracing::info!(
        step_id = step.id,
        country_code = %code,
        sort_order = step.sort_order,
        identity_id = admin.identity_id,
        "Country step created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: step })))
}

/// POST /api/v1/admin/countries/{code}/steps/reorder
///
/// Move one step, renumber the whole list densely from 0 and write the
/// new orders in a single statement. Returns the reordered list.
pub async fn reorder_steps(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<ReorderCountrySteps>,
) -> AppResult<impl IntoResponse> {
    let code = known_country(&state.pool, &code).await?;
    let mut steps = CountryStepRepo::list_by_country(&state.pool, &code).await?;

    reorder(&mut steps, input.from_index, input.to_index)?;
    let ids: Vec<DbId> = steps.iter().map(|s| s.id).collect();
    let orders = dense_sort_orders(&ids);
    let updated = CountryStepRepo::apply_sort_orders(&state.pool, &orders).await?;

    tracing::info!(
        country_code = %code,
        from = input.from_index,
        to = input.to_index,
        updated,
        identity_id = admin.identity_id,
        "Country steps reordered",
    );

    let steps = CountryStepRepo::list_by_country(&state.pool, &code).await?;
    Ok(Json(DataResponse { data: steps }))
}

/// PUT /api/v1/admin/steps/{id}
pub async fn update_step(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(step_id): Path<DbId>,
    Json(input): Json<UpdateCountryStep>,
) -> AppResult<impl IntoResponse> {
    let step = CountryStepRepo::update(&state.pool, step_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CountryStep",
            id: step_id,
        }))?;

    tracing::info!(step_id, identity_id = admin.identity_id, "Country step updated");

    Ok(Json(DataResponse { data: step }))
}

/// DELETE /api/v1/admin/steps/{id}
///
/// The remaining steps keep their sort orders; the next reorder closes the gap.
pub async fn delete_step(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(step_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CountryStepRepo::delete(&state.pool, step_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CountryStep",
            id: step_id,
        }));
    }

    tracing::info!(step_id, identity_id = admin.identity_id, "Country step deleted");

    Ok(StatusCode::NO_CONTENT)
}
