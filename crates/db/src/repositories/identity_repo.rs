//! Repository for the `identities` table.

use sqlx::PgPool;
use raze_core::types::DbId;

use crate::models::identity::{Identity, UpsertIdentity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, provider, subject, email, display_name, avatar_url, role, \
                        created_at, updated_at";

pub struct IdentityRepo;

impl IdentityRepo {
    /// Record a sign-in, creating the identity on first sight.
    ///
    /// Profile fields and role are refreshed from the provider on every
    /// sign-in so that admin list changes take effect at the next login.
    pub async fn upsert(pool: &PgPool, input: &UpsertIdentity) -> Result<Identity, sqlx::Error> {
        let query = format!(
            "INSERT INTO identities (provider, subject, email, display_name, avatar_url, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (provider, subject) DO UPDATE
             SET email = EXCLUDED.email,
                 display_name = EXCLUDED.display_name,
                 avatar_url = EXCLUDED.avatar_url,
                 role = EXCLUDED.role
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Identity>(&query)
            .bind(&input.provider)
            .bind(&input.subject)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.avatar_url)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Identity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM identities WHERE id = $1");
        sqlx::query_as::<_, Identity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
