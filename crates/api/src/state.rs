use std::sync::Arc;

use raze_core::progress::ProgressStore;

use crate::auth::oauth::IdentityProvider;
use crate::auth::session_events::SessionEventBus;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: raze_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External OAuth identity provider.
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// Wizard progress storage.
    pub progress_store: Arc<dyn ProgressStore>,
    /// Sign-in / sign-out notifications.
    pub session_events: Arc<SessionEventBus>,
}
