//! Handlers for the `/progress` resource.
//!
//! Reads go through [`ProgressAdapter`], so a missing row and a store
//! failure both answer with empty progress. Writes report a
//! [`PersistOutcome`] instead of failing the request.

use axum::extract::State;
use axum::Json;
use raze_core::error::CoreError;
use raze_core::form::{validate_form, FormData};
use raze_core::progress::{ProgressAdapter, SavedProgress};
use raze_core::wizard::PersistOutcome;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /progress`.
#[derive(Debug, Deserialize)]
pub struct SaveProgressRequest {
    pub current_step: i32,
    #[serde(default)]
    pub form_data: FormData,
}

/// Request body for `PUT /progress/path`.
#[derive(Debug, Deserialize)]
pub struct SavePathRequest {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub persisted: PersistOutcome,
}

fn outcome(saved: bool) -> PersistOutcome {
    if saved {
        PersistOutcome::Saved
    } else {
        PersistOutcome::Failed
    }
}

/// GET /api/v1/progress
pub async fn get_progress(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<SavedProgress>>> {
    let progress = ProgressAdapter::new(state.progress_store.as_ref())
        .load(user.identity_id)
        .await;
    Ok(Json(DataResponse { data: progress }))
}

/// PUT /api/v1/progress
///
/// Save the step and form data. Negative steps are rejected.
pub async fn save_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SaveProgressRequest>,
) -> AppResult<Json<DataResponse<SaveResponse>>> {
    if input.current_step < 0 {
        return Err(CoreError::Validation("current_step must not be negative".into()).into());
    }
    validate_form(&input.form_data, &state.config.wizard.limits)?;

    let saved = ProgressAdapter::new(state.progress_store.as_ref())
        .save(user.identity_id, input.current_step, &input.form_data)
        .await;

    Ok(Json(DataResponse {
        data: SaveResponse {
            persisted: outcome(saved),
        },
    }))
}

/// PUT /api/v1/progress/path
///
/// Remember the client's last path for the post-sign-in redirect.
pub async fn save_path(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SavePathRequest>,
) -> AppResult<Json<DataResponse<SaveResponse>>> {
    if !input.path.starts_with('/') || input.path.starts_with("//") {
        return Err(CoreError::Validation("path must be an absolute in-app path".into()).into());
    }

    let saved = ProgressAdapter::new(state.progress_store.as_ref())
        .save_path(user.identity_id, &input.path)
        .await;

    Ok(Json(DataResponse {
        data: SaveResponse {
            persisted: outcome(saved),
        },
    }))
}
