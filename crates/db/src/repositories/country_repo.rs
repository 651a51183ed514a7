use sqlx::PgPool;

use crate::models::country::CountryRow;

pub struct CountryRepo;

impl CountryRepo {
    /// All countries ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<CountryRow>, sqlx::Error> {
        sqlx::query_as::<_, CountryRow>("SELECT code, name FROM countries ORDER BY name")
            .fetch_all(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM countries WHERE code = $1)")
            .bind(code)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
