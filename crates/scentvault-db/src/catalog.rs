//! PostgreSQL implementation of CatalogRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use scentvault_core::{CatalogRepository, Error, Perfume, PerfumeInput, Result};

const SELECT_COLUMNS: &str = r#"
    SELECT id, number, name, description, top_notes, middle_notes, base_notes,
           usage_context, target_audience, occasion_location, scent_family,
           quality_tier, image_url
    FROM perfume
"#;

/// Catalog stored in the `perfume` table.
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: Pool<Postgres>,
}

impl PgCatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_perfume(row: &PgRow) -> Result<Perfume> {
        let audience: String = row.get("target_audience");
        let tier: String = row.get("quality_tier");
        Ok(Perfume {
            id: row.get("id"),
            number: row.get("number"),
            name: row.get("name"),
            description: row.get("description"),
            top_notes: row.get("top_notes"),
            middle_notes: row.get("middle_notes"),
            base_notes: row.get("base_notes"),
            usage_context: row.get("usage_context"),
            target_audience: audience.parse().map_err(Error::InvalidInput)?,
            occasion_location: row.get("occasion_location"),
            scent_family: row.get("scent_family"),
            quality_tier: tier.parse().map_err(Error::InvalidInput)?,
            image_url: row.get("image_url"),
        })
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    #[instrument(skip(self), fields(subsystem = "db", component = "catalog", op = "list_all"))]
    async fn list_all(&self) -> Result<Vec<Perfume>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY number ASC NULLS LAST, name ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let perfumes = rows
            .iter()
            .map(Self::row_to_perfume)
            .collect::<Result<Vec<_>>>()?;
        debug!(result_count = perfumes.len(), "Catalog read");
        Ok(perfumes)
    }

    async fn get(&self, id: &str) -> Result<Option<Perfume>> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(Self::row_to_perfume).transpose()
    }

    #[instrument(skip(self, input), fields(subsystem = "db", component = "catalog", op = "insert"))]
    async fn insert(&self, input: PerfumeInput) -> Result<String> {
        input.validate()?;
        let id = Uuid::now_v7().to_string();

        sqlx::query(
            r#"
            INSERT INTO perfume (
                id, number, name, description, top_notes, middle_notes, base_notes,
                usage_context, target_audience, occasion_location, scent_family,
                quality_tier, image_url
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&id)
        .bind(input.number)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.top_notes)
        .bind(&input.middle_notes)
        .bind(&input.base_notes)
        .bind(&input.usage_context)
        .bind(input.target_audience.to_string())
        .bind(&input.occasion_location)
        .bind(&input.scent_family)
        .bind(input.quality_tier.to_string())
        .bind(&input.image_url)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(perfume_id = %id, "Perfume inserted");
        Ok(id)
    }

    #[instrument(skip(self, input), fields(subsystem = "db", component = "catalog", op = "update", perfume_id = %id))]
    async fn update(&self, id: &str, input: PerfumeInput) -> Result<()> {
        input.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE perfume SET
                number = $2, name = $3, description = $4, top_notes = $5,
                middle_notes = $6, base_notes = $7, usage_context = $8,
                target_audience = $9, occasion_location = $10, scent_family = $11,
                quality_tier = $12, image_url = $13, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.number)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.top_notes)
        .bind(&input.middle_notes)
        .bind(&input.base_notes)
        .bind(&input.usage_context)
        .bind(input.target_audience.to_string())
        .bind(&input.occasion_location)
        .bind(&input.scent_family)
        .bind(input.quality_tier.to_string())
        .bind(&input.image_url)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::PerfumeNotFound(id.to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "catalog", op = "delete", perfume_id = %id))]
    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM perfume WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::PerfumeNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM perfume")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(count)
    }
}
