//! Route definitions for the `/progress` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress` (all require auth).
///
/// ```text
/// GET /       -> get_progress
/// PUT /       -> save_progress
/// PUT /path   -> save_path
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(progress::get_progress).put(progress::save_progress),
        )
        .route("/path", put(progress::save_path))
}
