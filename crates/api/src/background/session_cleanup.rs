//! Periodic purge of dead refresh-token sessions.
//!
//! Token rotation and sign-out only flag rows as revoked, so without this
//! job `user_sessions` keeps every session ever issued.

use std::time::Duration;

use raze_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run one sweep, logging the outcome. Returns the number of rows removed.
pub async fn sweep(pool: &PgPool) -> u64 {
    match SessionRepo::cleanup_expired(pool).await {
        Ok(deleted) => {
            if deleted > 0 {
                tracing::info!(deleted, "Session cleanup: purged expired or revoked sessions");
            } else {
                tracing::debug!("Session cleanup: nothing to purge");
            }
            deleted
        }
        Err(e) => {
            tracing::error!(error = %e, "Session cleanup failed");
            0
        }
    }
}

/// Sweep every `interval_secs` (the first sweep runs immediately) until
/// `cancel` is triggered.
pub async fn run(pool: PgPool, interval_secs: u64, cancel: CancellationToken) {
    let every = Duration::from_secs(interval_secs.max(1));
    tracing::info!(interval_secs = every.as_secs(), "Session cleanup job started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                sweep(&pool).await;
            }
        }
    }
}
