//! Repository for the `providers` table.

use sqlx::PgPool;
use raze_core::types::DbId;

use crate::models::provider::{CreateProvider, Provider, UpdateProvider};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, provider_type, website, phone, email, image_url, countries, \
                        created_at, updated_at";

/// Provides CRUD operations for relocation providers.
pub struct ProviderRepo;

impl ProviderRepo {
    /// Insert a new provider, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProvider) -> Result<Provider, sqlx::Error> {
        let query = format!(
            "INSERT INTO providers (name, provider_type, website, phone, email, image_url, countries)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(&input.name)
            .bind(&input.provider_type)
            .bind(&input.website)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.image_url)
            .bind(&input.countries)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Provider>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM providers WHERE id = $1");
        sqlx::query_as::<_, Provider>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List providers ordered by name.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Provider>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM providers ORDER BY name, id LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Providers serving any of the given countries, ordered by name.
    pub async fn list_by_countries(
        pool: &PgPool,
        codes: &[String],
    ) -> Result<Vec<Provider>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM providers WHERE countries && $1::text[] ORDER BY name, id"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(codes)
            .fetch_all(pool)
            .await
    }

    /// Update a provider. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProvider,
    ) -> Result<Option<Provider>, sqlx::Error> {
        let query = format!(
            "UPDATE providers SET
                name = COALESCE($2, name),
                provider_type = COALESCE($3, provider_type),
                website = COALESCE($4, website),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                image_url = COALESCE($7, image_url),
                countries = COALESCE($8, countries)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.provider_type)
            .bind(&input.website)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.image_url)
            .bind(&input.countries)
            .fetch_optional(pool)
            .await
    }

    /// Delete a provider. Country steps that reference it are left as they are.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
