//! PostgreSQL implementation of FaqRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use curator_core::entities::FaqEntry;
use curator_core::traits::{FaqRepository, RepoResult};

use crate::models::FaqEntryModel;

use super::error::map_db_error;

/// PostgreSQL implementation of FaqRepository
#[derive(Clone)]
pub struct PgFaqRepository {
    pool: PgPool,
}

impl PgFaqRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FaqRepository for PgFaqRepository {
    #[instrument(skip(self))]
    async fn list(&self, category: Option<&str>) -> RepoResult<Vec<FaqEntry>> {
        let results = sqlx::query_as::<_, FaqEntryModel>(
            r"
            SELECT id, question, answer, category, source_submission_id, created_at
            FROM faq_entries
            WHERE $1::TEXT IS NULL OR category = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(FaqEntry::from).collect())
    }
}
