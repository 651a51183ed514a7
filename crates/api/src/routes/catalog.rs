//! Lookup routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::{catalog, plan};
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET /countries     -> list_countries
/// GET /professions   -> list_professions (?q=)
/// GET /plan          -> get_plan (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(catalog::list_countries))
        .route("/professions", get(catalog::list_professions))
        .route("/plan", get(plan::get_plan))
}
