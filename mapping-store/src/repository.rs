use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{MappingError, MappingResult};
use crate::models::{Mapping, NewMapping};

const MAPPING_COLUMNS: &str =
    "id, cipher_text, dek_wrapped, deterministic, reversible, token_ttl, created_at";

#[async_trait]
pub trait MappingRepository: Send + Sync {
    async fn insert(&self, mapping: NewMapping) -> MappingResult<Mapping>;
    async fn select_by_id(&self, id: Uuid) -> MappingResult<Option<Mapping>>;
    async fn select_all(&self) -> MappingResult<Vec<Mapping>>;
    async fn update_ttl(&self, id: Uuid, token_ttl: i64) -> MappingResult<Mapping>;
    async fn delete_by_id(&self, id: Uuid) -> MappingResult<()>;
    /// Bulk-delete every expired row, returning the deleted identifiers so
    /// the caller can evict the cache copies.
    async fn delete_expired(&self) -> MappingResult<Vec<Uuid>>;
}

pub struct PgMappingRepository {
    pool: PgPool,
}

impl PgMappingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn insert(&self, mapping: NewMapping) -> MappingResult<Mapping> {
        let query = format!(
            "INSERT INTO mapping.mappings \
             (cipher_text, dek_wrapped, deterministic, reversible, token_ttl) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {MAPPING_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Mapping>(&query)
            .bind(&mapping.cipher_text)
            .bind(&mapping.dek_wrapped)
            .bind(mapping.deterministic)
            .bind(mapping.reversible)
            .bind(mapping.token_ttl)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    MappingError::AlreadyExists
                }
                _ => MappingError::Database(e),
            })?;

        Ok(row)
    }

    async fn select_by_id(&self, id: Uuid) -> MappingResult<Option<Mapping>> {
        let query = format!("SELECT {MAPPING_COLUMNS} FROM mapping.mappings WHERE id = $1");
        let row = sqlx::query_as::<_, Mapping>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn select_all(&self) -> MappingResult<Vec<Mapping>> {
        let query = format!("SELECT {MAPPING_COLUMNS} FROM mapping.mappings");
        let rows = sqlx::query_as::<_, Mapping>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_ttl(&self, id: Uuid, token_ttl: i64) -> MappingResult<Mapping> {
        let query = format!(
            "UPDATE mapping.mappings SET token_ttl = $2 WHERE id = $1 \
             RETURNING {MAPPING_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Mapping>(&query)
            .bind(id)
            .bind(token_ttl)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(MappingError::NotFound)?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: Uuid) -> MappingResult<()> {
        let result = sqlx::query("DELETE FROM mapping.mappings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MappingError::NotFound);
        }
        Ok(())
    }

    async fn delete_expired(&self) -> MappingResult<Vec<Uuid>> {
        // token_ttl is nanoseconds; float division keeps this predicate in
        // agreement with Mapping::is_expired_at down to interval precision.
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "DELETE FROM mapping.mappings \
             WHERE created_at + (token_ttl / 1000000000.0 * interval '1 second') < now() \
             RETURNING id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
