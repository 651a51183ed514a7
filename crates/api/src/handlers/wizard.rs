//! Handlers for the `/wizard` resource.
//!
//! The wizard is stateless on the server: every request carries the
//! client's [`WizardSnapshot`] and every response returns the new one. The
//! caller's identity (if any) decides whether transitions are persisted.

use axum::extract::State;
use axum::Json;
use raze_core::form::{form_options, FieldUpdate, FormOptions, SelectionLimits};
use raze_core::plan::relocation_prompt;
use raze_core::return_action::ReturnAction;
use raze_core::wizard::{
    NextOutcome, PersistOutcome, StepController, StepDefinition, WizardSnapshot, WizardVariant,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::auth::sign_in_path;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of the step transitions (`next`, `back`, `submit`).
#[derive(Debug, Default, Deserialize)]
pub struct WizardRequest {
    #[serde(default)]
    pub state: WizardSnapshot,
}

/// Body of `PATCH /wizard/form`.
#[derive(Debug, Deserialize)]
pub struct FormPatchRequest {
    #[serde(default)]
    pub state: WizardSnapshot,
    pub updates: Vec<FieldUpdate>,
}

/// Static description of the configured wizard.
#[derive(Debug, Serialize)]
pub struct StepsResponse {
    pub variant: WizardVariant,
    pub total_steps: i32,
    pub require_personal_details: bool,
    pub limits: SelectionLimits,
    pub steps: Vec<StepDefinition>,
    pub options: FormOptions,
}

/// Where the wizard stands after a request.
#[derive(Debug, Serialize)]
pub struct WizardView {
    pub state: WizardSnapshot,
    /// Clamped step number, as rendered.
    pub current_step: i32,
    pub total_steps: i32,
    /// `None` once the plan is shown.
    pub step: Option<StepDefinition>,
}

#[derive(Debug, Serialize)]
pub struct NextResponse {
    #[serde(flatten)]
    pub wizard: WizardView,
    pub result: NextOutcome,
    /// Present when the user has to sign in before advancing.
    pub sign_in_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PersistResponse {
    #[serde(flatten)]
    pub wizard: WizardView,
    pub persisted: PersistOutcome,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub wizard: WizardView,
    pub persisted: PersistOutcome,
    pub prompt: String,
}

fn view(controller: &StepController<'_>) -> WizardView {
    WizardView {
        state: controller.snapshot(),
        current_step: controller.current_step(),
        total_steps: controller.total_steps(),
        step: (!controller.is_plan_shown()).then(|| controller.current_definition().clone()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/wizard/steps
pub async fn steps(State(state): State<AppState>) -> Json<DataResponse<StepsResponse>> {
    let config = &state.config.wizard;
    Json(DataResponse {
        data: StepsResponse {
            variant: config.variant,
            total_steps: config.total_steps(),
            require_personal_details: config.require_personal_details,
            limits: config.limits,
            steps: config.steps.clone(),
            options: form_options(),
        },
    })
}

/// POST /api/v1/wizard/start
///
/// Resume from saved progress when signed in, otherwise start at step 1.
pub async fn start(
    State(state): State<AppState>,
    user: MaybeAuthUser,
) -> Json<DataResponse<WizardView>> {
    let session = user.session();
    let controller = StepController::restore(
        &state.config.wizard,
        &session,
        state.progress_store.as_ref(),
    )
    .await;
    Json(DataResponse {
        data: view(&controller),
    })
}

/// POST /api/v1/wizard/next
///
/// Signed-out callers get `sign_in_required` and a sign-in URL that brings
/// them back to the form.
pub async fn next(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Json(input): Json<WizardRequest>,
) -> AppResult<Json<DataResponse<NextResponse>>> {
    let session = user.session();
    let mut controller = StepController::from_snapshot(
        &state.config.wizard,
        &session,
        state.progress_store.as_ref(),
        input.state,
    )?;

    let result = controller.next().await?;
    let sign_in_url = matches!(result, NextOutcome::SignInRequired)
        .then(|| sign_in_path(Some(ReturnAction::ShowForm)));

    Ok(Json(DataResponse {
        data: NextResponse {
            wizard: view(&controller),
            result,
            sign_in_url,
        },
    }))
}

/// POST /api/v1/wizard/back
pub async fn back(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Json(input): Json<WizardRequest>,
) -> AppResult<Json<DataResponse<PersistResponse>>> {
    let session = user.session();
    let mut controller = StepController::from_snapshot(
        &state.config.wizard,
        &session,
        state.progress_store.as_ref(),
        input.state,
    )?;

    let persisted = controller.back().await?;

    Ok(Json(DataResponse {
        data: PersistResponse {
            wizard: view(&controller),
            persisted,
        },
    }))
}

/// PATCH /api/v1/wizard/form
///
/// Apply every update, then commit once. A rejected update fails the whole
/// batch and nothing is written.
pub async fn update_form(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Json(input): Json<FormPatchRequest>,
) -> AppResult<Json<DataResponse<PersistResponse>>> {
    let session = user.session();
    let mut controller = StepController::from_snapshot(
        &state.config.wizard,
        &session,
        state.progress_store.as_ref(),
        input.state,
    )?;

    for update in input.updates {
        controller.update(update)?;
    }
    let persisted = controller.commit().await;

    Ok(Json(DataResponse {
        data: PersistResponse {
            wizard: view(&controller),
            persisted,
        },
    }))
}

/// POST /api/v1/wizard/submit
///
/// From the last step into the plan view. Returns the plan prompt.
pub async fn submit(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Json(input): Json<WizardRequest>,
) -> AppResult<Json<DataResponse<SubmitResponse>>> {
    let session = user.session();
    let mut controller = StepController::from_snapshot(
        &state.config.wizard,
        &session,
        state.progress_store.as_ref(),
        input.state,
    )?;

    let outcome = controller.submit().await?;
    let prompt = relocation_prompt(controller.form_data());

    tracing::info!(
        signed_in = session.is_signed_in(),
        persisted = ?outcome.persisted,
        "Relocation plan requested",
    );

    Ok(Json(DataResponse {
        data: SubmitResponse {
            wizard: view(&controller),
            persisted: outcome.persisted,
            prompt,
        },
    }))
}
