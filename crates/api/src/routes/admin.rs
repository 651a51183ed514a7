//! Route definitions for the admin directory screens.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, country_steps};
use crate::state::AppState;

/// Routes mounted at `/admin` (admin role required).
///
/// ```text
/// GET    /providers                          -> list_providers
/// POST   /providers                          -> create_provider
/// GET    /providers/{id}                     -> get_provider
/// PUT    /providers/{id}                     -> update_provider
/// DELETE /providers/{id}                     -> delete_provider
///
/// GET    /mentors                            -> list_mentors
/// POST   /mentors                            -> create_mentor
/// GET    /mentors/{id}                       -> get_mentor
/// PUT    /mentors/{id}                       -> update_mentor
/// DELETE /mentors/{id}                       -> delete_mentor
///
/// GET    /communities                        -> list_communities
/// POST   /communities                        -> create_community
/// GET    /communities/{id}                   -> get_community
/// PUT    /communities/{id}                   -> update_community
/// DELETE /communities/{id}                   -> delete_community
///
/// GET    /countries/{code}/steps             -> list_steps
/// POST   /countries/{code}/steps             -> create_step
/// POST   /countries/{code}/steps/reorder     -> reorder_steps
/// PUT    /steps/{id}                         -> update_step
/// DELETE /steps/{id}                         -> delete_step
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/providers",
            get(admin::list_providers).post(admin::create_provider),
        )
        .route(
            "/providers/{id}",
            get(admin::get_provider)
                .put(admin::update_provider)
                .delete(admin::delete_provider),
        )
        .route(
            "/mentors",
            get(admin::list_mentors).post(admin::create_mentor),
        )
        .route(
            "/mentors/{id}",
            get(admin::get_mentor)
                .put(admin::update_mentor)
                .delete(admin::delete_mentor),
        )
        .route(
            "/communities",
            get(admin::list_communities).post(admin::create_community),
        )
        .route(
            "/communities/{id}",
            get(admin::get_community)
                .put(admin::update_community)
                .delete(admin::delete_community),
        )
        .route(
            "/countries/{code}/steps",
            get(country_steps::list_steps).post(country_steps::create_step),
        )
        .route(
            "/countries/{code}/steps/reorder",
            post(country_steps::reorder_steps),
        )
        .route(
            "/steps/{id}",
            put(country_steps::update_step).delete(country_steps::delete_step),
        )
}
