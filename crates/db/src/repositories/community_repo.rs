//! Repository for the `communities` table.

use sqlx::PgPool;
use raze_core::types::DbId;

use crate::models::community::{Community, CreateCommunity, UpdateCommunity};

const COLUMNS: &str = "id, name, platform, url, members_count, country_code, \
                        created_at, updated_at";

pub struct CommunityRepo;

impl CommunityRepo {
    pub async fn create(pool: &PgPool, input: &CreateCommunity) -> Result<Community, sqlx::Error> {
        let query = format!(
            "INSERT INTO communities (name, platform, url, members_count, country_code)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Community>(&query)
            .bind(&input.name)
            .bind(&input.platform)
            .bind(&input.url)
            .bind(input.members_count)
            .bind(&input.country_code)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Community>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM communities WHERE id = $1");
        sqlx::query_as::<_, Community>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List communities, most recently created first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Community>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM communities ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Community>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Communities in any of the given countries, largest first.
    pub async fn list_by_countries(
        pool: &PgPool,
        codes: &[String],
    ) -> Result<Vec<Community>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM communities WHERE country_code = ANY($1) \
             ORDER BY members_count DESC NULLS LAST, id"
        );
        sqlx::query_as::<_, Community>(&query)
            .bind(codes)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCommunity,
    ) -> Result<Option<Community>, sqlx::Error> {
        let query = format!(
            "UPDATE communities SET
                name = COALESCE($2, name),
                platform = COALESCE($3, platform),
                url = COALESCE($4, url),
                members_count = COALESCE($5, members_count),
                country_code = COALESCE($6, country_code)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Community>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.platform)
            .bind(&input.url)
            .bind(input.members_count)
            .bind(&input.country_code)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM communities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
