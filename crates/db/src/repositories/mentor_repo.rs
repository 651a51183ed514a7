//! Repository for the `mentors` table.

use sqlx::PgPool;
use raze_core::types::DbId;

use crate::models::mentor::{CreateMentor, Mentor, UpdateMentor};

const COLUMNS: &str = "id, name, phone, email, country_code, relocated_at, image_url, \
                        created_at, updated_at";

pub struct MentorRepo;

impl MentorRepo {
    pub async fn create(pool: &PgPool, input: &CreateMentor) -> Result<Mentor, sqlx::Error> {
        let query = format!(
            "INSERT INTO mentors (name, phone, email, country_code, relocated_at, image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mentor>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.country_code)
            .bind(input.relocated_at)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Mentor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mentors WHERE id = $1");
        sqlx::query_as::<_, Mentor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List mentors, most recently created first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Mentor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mentors ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Mentor>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_countries(
        pool: &PgPool,
        codes: &[String],
    ) -> Result<Vec<Mentor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mentors WHERE country_code = ANY($1) ORDER BY name, id"
        );
        sqlx::query_as::<_, Mentor>(&query)
            .bind(codes)
            .fetch_all(pool)
            .await
    }

    /// Update a mentor. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMentor,
    ) -> Result<Option<Mentor>, sqlx::Error> {
        let query = format!(
            "UPDATE mentors SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                country_code = COALESCE($5, country_code),
                relocated_at = COALESCE($6, relocated_at),
                image_url = COALESCE($7, image_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mentor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.country_code)
            .bind(input.relocated_at)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM mentors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
