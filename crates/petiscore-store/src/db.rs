//! Collector query against the operations database.
//!
//! One parameterized query: petitions in a given rating set for the
//! Consumidor/Inicial segment, deduplicated to the most recent document per
//! request. The connection pool lives only for the collect stage.

use petiscore_core::PetitionRecord;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::StoreError;

/// Area id for Direito do Consumidor.
pub const AREA_CONSUMIDOR: i32 = 10;

/// Modality id for petição inicial.
pub const MODALITY_INICIAL: i32 = 4;

/// One row per request: the rating and the most recent wordprocessing
/// document attached to it. `DISTINCT ON (r.id)` with `rd.id DESC` picks the
/// latest document.
const PETITIONS_BY_RATING_SQL: &str = "
    SELECT DISTINCT ON (r.id)
      r.id AS request_id,
      rcr.value AS rating,
      rd.id AS doc_id,
      rd.url,
      rd.name,
      rd.source,
      rd.was_developed_with_ia,
      rcr.remark,
      rcr.rating_text
    FROM operations.request r
    JOIN operations.request_customer_rating rcr ON r.id = rcr.request_id
    JOIN operations.request_documents rd ON r.id = rd.request_id
    WHERE r.area_id = $1
      AND r.modality_id = $2
      AND rcr.value = ANY($3)
      AND rd.source = 'faciliter'
      AND rd.deleted IS NULL
      AND (rd.file_type LIKE '%wordprocessingml%' OR rd.name LIKE '%.docx' OR rd.name LIKE '%.doc')
    ORDER BY r.id, rd.id DESC
    LIMIT $4
";

/// Scoped handle on the operations database.
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Connect with a single-connection pool; the collector runs one query
    /// at a time.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Fetch petitions whose customer rating is in `ratings`, capped at
    /// `limit` rows.
    pub async fn petitions_by_rating(
        &self,
        ratings: &[i32],
        limit: i64,
    ) -> Result<Vec<PetitionRecord>, StoreError> {
        let rows = sqlx::query(PETITIONS_BY_RATING_SQL)
            .bind(AREA_CONSUMIDOR)
            .bind(MODALITY_INICIAL)
            .bind(ratings)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut petitions = Vec::with_capacity(rows.len());
        for row in &rows {
            petitions.push(PetitionRecord {
                request_id: row.try_get("request_id")?,
                rating: row.try_get("rating")?,
                doc_id: row.try_get("doc_id")?,
                url: row.try_get("url")?,
                name: row.try_get("name")?,
                source: row.try_get("source")?,
                was_developed_with_ia: row.try_get("was_developed_with_ia")?,
                remark: row.try_get("remark")?,
                rating_text: row.try_get("rating_text")?,
            });
        }

        info!(ratings = ?ratings, count = petitions.len(), "collected petitions");
        Ok(petitions)
    }

    /// Close the pool explicitly at the end of the collect stage.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
