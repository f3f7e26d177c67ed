//! PostgreSQL implementation of AuditLogRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use curator_core::entities::AuditLogEntry;
use curator_core::traits::{AuditLogQuery, AuditLogRepository, AuditSort, RepoResult};
use curator_core::value_objects::Snowflake;

use crate::models::AuditLogModel;

use super::error::{like_pattern, map_db_error};

/// Columns covered by the free-text search
const SEARCH_COLUMNS: [&str; 6] = [
    "field",
    "reviewer_name",
    "submitter_name",
    "notes",
    "target_slug",
    "old_value->>'value'",
];

/// PostgreSQL implementation of AuditLogRepository
#[derive(Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    #[instrument(skip(self))]
    async fn list(&self, query: &AuditLogQuery) -> RepoResult<Vec<AuditLogEntry>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM audit_log WHERE TRUE",
            AuditLogModel::COLUMNS
        ));

        if let Some(role) = query.reviewer_role {
            builder
                .push(" AND reviewer_role = ")
                .push_bind(role.as_str());
        }
        if let Some(field) = &query.field {
            builder.push(" AND field = ").push_bind(field.clone());
        }
        if let Some(submitter_id) = query.submitter_id {
            builder
                .push(" AND submitter_id = ")
                .push_bind(submitter_id.into_inner());
        }
        if let Some(reviewer_id) = query.reviewer_id {
            builder
                .push(" AND reviewer_id = ")
                .push_bind(reviewer_id.into_inner());
        }
        if let Some(needle) = query.search_needle() {
            let pattern = like_pattern(&needle);
            builder.push(" AND (");
            for column in SEARCH_COLUMNS {
                builder
                    .push(column)
                    .push(" ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR ");
            }
            builder
                .push("new_value->>'value' ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder.push(match query.sort {
            AuditSort::Newest => " ORDER BY created_at DESC, id DESC",
            AuditSort::Oldest => " ORDER BY created_at ASC, id ASC",
        });
        builder
            .push(" LIMIT ")
            .push_bind(query.limit.clamp(1, AuditLogQuery::MAX_LIMIT))
            .push(" OFFSET ")
            .push_bind(query.offset.max(0));

        let results = builder
            .build_query_as::<AuditLogModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        results.into_iter().map(AuditLogEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_submission(
        &self,
        submission_id: Snowflake,
    ) -> RepoResult<Option<AuditLogEntry>> {
        let result = sqlx::query_as::<_, AuditLogModel>(&format!(
            "SELECT {} FROM audit_log WHERE submission_id = $1",
            AuditLogModel::COLUMNS
        ))
        .bind(submission_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AuditLogEntry::try_from).transpose()
    }
}
