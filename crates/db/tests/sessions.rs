//! Integration tests for refresh-token session housekeeping.

use chrono::{Duration, Utc};
use raze_db::models::identity::UpsertIdentity;
use raze_db::models::session::CreateSession;
use raze_db::repositories::{IdentityRepo, SessionRepo};
use sqlx::PgPool;

async fn new_identity(pool: &PgPool, subject: &str) -> i64 {
    let input = UpsertIdentity {
        provider: "google".to_string(),
        subject: subject.to_string(),
        email: format!("{subject}@example.com"),
        display_name: None,
        avatar_url: None,
        role: "user".to_string(),
    };
    IdentityRepo::upsert(pool, &input).await.unwrap().id
}

async fn new_session(pool: &PgPool, identity_id: i64, hash: &str, ttl: Duration) -> i64 {
    let input = CreateSession {
        identity_id,
        refresh_token_hash: hash.to_string(),
        expires_at: Utc::now() + ttl,
        user_agent: None,
    };
    SessionRepo::create(pool, &input).await.unwrap().id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cleanup_removes_expired_and_revoked_sessions_only(pool: PgPool) {
    let id = new_identity(&pool, "s1").await;
    let active = new_session(&pool, id, "active", Duration::days(7)).await;
    new_session(&pool, id, "expired", Duration::hours(-1)).await;
    let revoked = new_session(&pool, id, "revoked", Duration::days(7)).await;
    assert!(SessionRepo::revoke(&pool, revoked).await.unwrap());

    let deleted = SessionRepo::cleanup_expired(&pool).await.unwrap();
    assert_eq!(deleted, 2);

    let remaining: Vec<(i64,)> = sqlx::query_as("SELECT id FROM user_sessions")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, vec![(active,)]);
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "active")
        .await
        .unwrap()
        .is_some());

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 0);
}
