//! Handler for `GET /plan`: the relocation plan for the caller's saved form.

use axum::extract::State;
use axum::Json;
use raze_core::form::Country;
use raze_core::plan::{relocation_prompt, PLAN_SECTIONS};
use raze_core::progress::ProgressAdapter;
use raze_db::models::community::Community;
use raze_db::models::country_step::CountryStep;
use raze_db::models::mentor::Mentor;
use raze_db::models::provider::Provider;
use raze_db::repositories::{CommunityRepo, CountryStepRepo, MentorRepo, ProviderRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// The plan prompt plus the directory entries for the destination countries.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub prompt: String,
    pub sections: &'static [&'static str],
    pub destinations: Vec<Country>,
    pub providers: Vec<Provider>,
    pub mentors: Vec<Mentor>,
    pub communities: Vec<Community>,
    /// Ordered per country.
    pub steps: Vec<CountryStep>,
}

/// GET /api/v1/plan
pub async fn get_plan(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<PlanResponse>>> {
    let saved = ProgressAdapter::new(state.progress_store.as_ref())
        .load(user.identity_id)
        .await;
    let form = saved.form_data;

    let codes: Vec<String> = form
        .destination_countries
        .iter()
        .map(|c| c.code.clone())
        .collect();

    let (providers, mentors, communities, steps) = if codes.is_empty() {
        Default::default()
    } else {
        tokio::try_join!(
            ProviderRepo::list_by_countries(&state.pool, &codes),
            MentorRepo::list_by_countries(&state.pool, &codes),
            CommunityRepo::list_by_countries(&state.pool, &codes),
            CountryStepRepo::list_by_countries(&state.pool, &codes),
        )?
    };

    tracing::debug!(
        identity_id = user.identity_id,
        destinations = codes.len(),
        providers = providers.len(),
        "Plan assembled",
    );

    Ok(Json(DataResponse {
        data: PlanResponse {
            prompt: relocation_prompt(&form),
            sections: &PLAN_SECTIONS,
            destinations: form.destination_countries,
            providers,
            mentors,
            communities,
            steps,
        },
    }))
}
