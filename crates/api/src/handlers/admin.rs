//! Admin handlers for the relocation directory: providers, mentors and
//! communities. Every endpoint requires the `admin` role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use raze_core::error::CoreError;
use raze_core::form::is_valid_country_code;
use raze_core::paging::{clamp_limit, clamp_offset};
use raze_core::types::DbId;
use raze_db::models::community::{CreateCommunity, UpdateCommunity};
use raze_db::models::mentor::{CreateMentor, UpdateMentor};
use raze_db::models::provider::{CreateProvider, UpdateProvider};
use raze_db::repositories::{CommunityRepo, MentorRepo, ProviderRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PaginationParams, DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

fn ensure_country_codes<'a>(codes: impl IntoIterator<Item = &'a String>) -> AppResult<()> {
    for code in codes {
        if !is_valid_country_code(code) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "'{code}' is not a valid country code"
            ))));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/providers
///
/// List providers ordered by name.
pub async fn list_providers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);
    let providers = ProviderRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(DataResponse { data: providers }))
}

/// POST /api/v1/admin/providers
pub async fn create_provider(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProvider>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_country_codes(&input.countries)?;

    let provider = ProviderRepo::create(&state.pool, &input).await?;

    tracing::info!(
        provider_id = provider.id,
        name = %provider.name,
        identity_id = admin.identity_id,
        "Provider created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: provider })))
}

/// GET /api/v1/admin/providers/{id}
pub async fn get_provider(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(provider_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let provider = ProviderRepo::find_by_id(&state.pool, provider_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Provider",
            id: provider_id,
        }))?;

    Ok(Json(DataResponse { data: provider }))
}

/// PUT /api/v1/admin/providers/{id}
///
/// Partially update a provider.
pub async fn update_provider(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(provider_id): Path<DbId>,
    Json(input): Json<UpdateProvider>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(countries) = &input.countries {
        ensure_country_codes(countries)?;
    }

    let provider = ProviderRepo::update(&state.pool, provider_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Provider",
            id: provider_id,
        }))?;

    tracing::info!(provider_id, identity_id = admin.identity_id, "Provider updated");

    Ok(Json(DataResponse { data: provider }))
}

/// DELETE /api/v1/admin/providers/{id}
///
/// Country steps that point at the provider keep their dangling reference.
pub async fn delete_provider(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(provider_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProviderRepo::delete(&state.pool, provider_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Provider",
            id: provider_id,
        }));
    }

    tracing::info!(provider_id, identity_id = admin.identity_id, "Provider deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Mentors
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/mentors
///
/// Newest first.
pub async fn list_mentors(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);
    let mentors = MentorRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(DataResponse { data: mentors }))
}

/// POST /api/v1/admin/mentors
pub async fn create_mentor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMentor>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let mentor = MentorRepo::create(&state.pool, &input).await?;

    tracing::info!(
        mentor_id = mentor.id,
        country_code = %mentor.country_code,
        identity_id = admin.identity_id,
        "Mentor created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: mentor })))
}

/// GET /api/v1/admin/mentors/{id}
pub async fn get_mentor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(mentor_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mentor = MentorRepo::find_by_id(&state.pool, mentor_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Mentor",
            id: mentor_id,
        }))?;

    Ok(Json(DataResponse { data: mentor }))
}

/// PUT /api/v1/admin/mentors/{id}
pub async fn update_mentor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(mentor_id): Path<DbId>,
    Json(input): Json<UpdateMentor>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let mentor = MentorRepo::update(&state.pool, mentor_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Mentor",
            id: mentor_id,
        }))?;

    tracing::info!(mentor_id, identity_id = admin.identity_id, "Mentor updated");

    Ok(Json(DataResponse { data: mentor }))
}

/// DELETE /api/v1/admin/mentors/{id}
pub async fn delete_mentor(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(mentor_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !MentorRepo::delete(&state.pool, mentor_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Mentor",
            id: mentor_id,
        }));
    }

    tracing::info!(mentor_id, identity_id = admin.identity_id, "Mentor deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Communities
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/communities
pub async fn list_communities(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);
    let communities = CommunityRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(DataResponse { data: communities }))
}

/// POST /api/v1/admin/communities
pub async fn create_community(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCommunity>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let community = CommunityRepo::create(&state.pool, &input).await?;

    tracing::info!(
        community_id = community.id,
        platform = %community.platform,
        identity_id = admin.identity_id,
        "Community created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: community })))
}

/// GET /api/v1/admin/communities/{id}
pub async fn get_community(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(community_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let community = CommunityRepo::find_by_id(&state.pool, community_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Community",
            id: community_id,
        }))?;

    Ok(Json(DataResponse { data: community }))
}

/// PUT /api/v1/admin/communities/{id}
pub async fn update_community(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(community_id): Path<DbId>,
    Json(input): Json<UpdateCommunity>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let community = CommunityRepo::update(&state.pool, community_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Community",
            id: community_id,
        }))?;

    tracing::info!(community_id, identity_id = admin.identity_id, "Community updated");

    Ok(Json(DataResponse { data: community }))
}

/// DELETE /api/v1/admin/communities/{id}
pub async fn delete_community(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(community_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CommunityRepo::delete(&state.pool, community_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Community",
            id: community_id,
        }));
    }

    tracing::info!(community_id, identity_id = admin.identity_id, "Community deleted");

    Ok(StatusCode::NO_CONTENT)
}
