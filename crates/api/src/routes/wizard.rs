//! Route definitions for the intake wizard.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::wizard;
use crate::state::AppState;

/// Routes mounted at `/wizard`. Auth is optional; transitions are only
/// persisted for signed-in callers.
///
/// ```text
/// GET   /steps    -> steps
/// POST  /start    -> start
/// POST  /next     -> next
/// POST  /back     -> back
/// PATCH /form     -> update_form
/// POST  /submit   -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/steps", get(wizard::steps))
        .route("/start", post(wizard::start))
        .route("/next", post(wizard::next))
        .route("/back", post(wizard::back))
        .route("/form", patch(wizard::update_form))
        .route("/submit", post(wizard::submit))
}
