//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET  /sign-in    -> sign_in (redirect to provider)
/// GET  /callback   -> callback
/// GET  /session    -> session (identity or null)
/// POST /refresh    -> refresh
/// POST /sign-out   -> sign_out (requires auth)
/// GET  /events     -> events (SSE, requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in))
        .route("/callback", get(auth::callback))
        .route("/session", get(auth::session))
        .route("/refresh", post(auth::refresh))
        .route("/sign-out", post(auth::sign_out))
        .route("/events", get(auth::events))
}
