pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod progress;
pub mod wizard;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/sign-in                                    redirect to provider (?returnTo=)
/// /auth/callback                                   complete sign-in
/// /auth/session                                    current identity or null
/// /auth/refresh                                    rotate tokens (POST)
/// /auth/sign-out                                   revoke sessions (POST)
/// /auth/events                                     session changes (SSE)
///
/// /progress                                        get, save (auth required)
/// /progress/path                                   save last path (PUT)
///
/// /wizard/steps                                    step definitions and options
/// /wizard/start                                    restore or start (POST)
/// /wizard/next                                     advance (POST)
/// /wizard/back                                     retreat (POST)
/// /wizard/form                                     batched field updates (PATCH)
/// /wizard/submit                                   show plan (POST)
///
/// /plan                                            plan for saved progress (auth required)
/// /countries                                       country lookup
/// /professions                                     profession catalog (?q=)
///
/// /admin/providers                                 list, create (admin only)
/// /admin/providers/{id}                            get, update, delete
/// /admin/mentors                                   list, create
/// /admin/mentors/{id}                              get, update, delete
/// /admin/communities                               list, create
/// /admin/communities/{id}                          get, update, delete
/// /admin/countries/{code}/steps                    list, create
/// /admin/countries/{code}/steps/reorder            reorder (POST)
/// /admin/steps/{id}                                update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Sign-in, session and session-change stream.
        .nest("/auth", auth::router())
        // Saved wizard progress.
        .nest("/progress", progress::router())
        // Intake wizard transitions.
        .nest("/wizard", wizard::router())
        // Lookups and the plan view.
        .merge(catalog::router())
        // Directory administration.
        .nest("/admin", admin::router())
}
