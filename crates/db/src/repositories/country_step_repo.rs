//! Repository for the `country_steps` table.

use sqlx::PgPool;
use raze_core::types::DbId;

use crate::models::country_step::{CountryStep, CreateCountryStep, UpdateCountryStep};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, country_code, title, description, sort_order, provider_id, \
                        created_at, updated_at";

/// Ordered per-country steps.
pub struct CountryStepRepo;

impl CountryStepRepo {
    /// Steps of one country ordered by `sort_order`.
    pub async fn list_by_country(
        pool: &PgPool,
        country_code: &str,
    ) -> Result<Vec<CountryStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM country_steps WHERE country_code = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, CountryStep>(&query)
            .bind(country_code)
            .fetch_all(pool)
            .await
    }

    /// Steps of several countries, grouped by country and ordered within each.
    pub async fn list_by_countries(
        pool: &PgPool,
        codes: &[String],
    ) -> Result<Vec<CountryStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM country_steps WHERE country_code = ANY($1) \
             ORDER BY country_code, sort_order, id"
        );
        sqlx::query_as::<_, CountryStep>(&query)
            .bind(codes)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CountryStep>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM country_steps WHERE id = $1");
        sqlx::query_as::<_, CountryStep>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append a step at the end of the country's list
    /// (`sort_order` = current step count).
    pub async fn create(
        pool: &PgPool,
        country_code: &str,
        input: &CreateCountryStep,
    ) -> Result<CountryStep, sqlx::Error> {
        let query = format!(
            "INSERT INTO country_steps (country_code, title, description, sort_order, provider_id)
             VALUES ($1, $2, $3,
                     (SELECT COUNT(*)::int FROM country_steps WHERE country_code = $1),
                     $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CountryStep>(&query)
            .bind(country_code)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.provider_id)
            .fetch_one(pool)
            .await
    }

    /// Update a step. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCountryStep,
    ) -> Result<Option<CountryStep>, sqlx::Error> {
        let query = format!(
            "UPDATE country_steps SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                provider_id = COALESCE($4, provider_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CountryStep>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.provider_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM country_steps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_country(pool: &PgPool, country_code: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM country_steps WHERE country_code = $1")
                .bind(country_code)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Write `(id, sort_order)` pairs in one statement. Returns rows updated.
    pub async fn apply_sort_orders(
        pool: &PgPool,
        orders: &[(DbId, i32)],
    ) -> Result<u64, sqlx::Error> {
        let (ids, sort_orders): (Vec<DbId>, Vec<i32>) = orders.iter().copied().unzip();
        let result = sqlx::query(
            "UPDATE country_steps AS cs SET sort_order = v.sort_order
             FROM UNNEST($1::bigint[], $2::int[]) AS v(id, sort_order)
             WHERE cs.id = v.id",
        )
        .bind(&ids)
        .bind(&sort_orders)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
