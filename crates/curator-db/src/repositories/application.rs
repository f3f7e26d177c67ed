//! PostgreSQL implementation of ApplicationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use curator_core::entities::{ApplicationStatus, ReviewerApplication};
use curator_core::traits::{ApplicationRepository, RepoResult};
use curator_core::value_objects::Snowflake;
use curator_core::DomainError;

use crate::models::ApplicationModel;

use super::error::{application_not_found, map_db_error, map_insert_error};

const APPLICATION_COLUMNS: &str =
    "id, user_id, motivation, experience, status, created_at, decided_at, decided_by, admin_notes";

/// PostgreSQL implementation of ApplicationRepository
#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        predicate: &str,
        user_id: Snowflake,
    ) -> RepoResult<Option<ReviewerApplication>> {
        let result = sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM reviewer_applications WHERE user_id = $1 {predicate} LIMIT 1"
        ))
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReviewerApplication::try_from).transpose()
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    #[instrument(skip(self, application), fields(application_id = %application.id, user_id = %application.user_id))]
    async fn create(&self, application: &ReviewerApplication) -> RepoResult<()> {
        // The partial unique index on pending rows settles concurrent applies
        sqlx::query(
            r"
            INSERT INTO reviewer_applications (id, user_id, motivation, experience, status, created_at)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            ",
        )
        .bind(application.id.into_inner())
        .bind(application.user_id.into_inner())
        .bind(&application.motivation)
        .bind(&application.experience)
        .bind(application.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                "reviewer_applications_user_id_fkey",
                application.user_id,
                || DomainError::PendingApplicationExists,
            )
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ReviewerApplication>> {
        let result = sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM reviewer_applications WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReviewerApplication::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ReviewerApplication>> {
        let results = sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM reviewer_applications
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results
            .into_iter()
            .map(ReviewerApplication::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn latest_by_user(&self, user_id: Snowflake) -> RepoResult<Option<ReviewerApplication>> {
        self.fetch_one_where("ORDER BY created_at DESC, id DESC", user_id)
            .await
    }

    #[instrument(skip(self))]
    async fn latest_rejected(&self, user_id: Snowflake) -> RepoResult<Option<ReviewerApplication>> {
        self.fetch_one_where(
            "AND status = 'rejected' ORDER BY decided_at DESC, id DESC",
            user_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn has_pending(&self, user_id: Snowflake) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviewer_applications WHERE user_id = $1 AND status = 'pending')",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn list_pending(&self, limit: i64) -> RepoResult<Vec<ReviewerApplication>> {
        let results = sqlx::query_as::<_, ApplicationModel>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM reviewer_applications
             WHERE status = 'pending'
             ORDER BY created_at ASC, id ASC
             LIMIT $1"
        ))
        .bind(limit.clamp(1, 500))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results
            .into_iter()
            .map(ReviewerApplication::try_from)
            .collect()
    }

    #[instrument(skip(self, decided), fields(application_id = %decided.id, status = %decided.status))]
    async fn decide(&self, decided: &ReviewerApplication) -> RepoResult<ReviewerApplication> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let updated = sqlx::query_as::<_, ApplicationModel>(&format!(
            r"
            UPDATE reviewer_applications
            SET status = $2, decided_at = $3, decided_by = $4, admin_notes = $5
            WHERE id = $1 AND status = 'pending'
            RETURNING {APPLICATION_COLUMNS}
            "
        ))
        .bind(decided.id.into_inner())
        .bind(decided.status.as_str())
        .bind(decided.decided_at)
        .bind(decided.decided_by.map(Snowflake::into_inner))
        .bind(decided.admin_notes.as_deref())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(updated) = updated else {
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT id FROM reviewer_applications WHERE id = $1")
                    .bind(decided.id.into_inner())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            return Err(match exists {
                Some(_) => DomainError::ApplicationAlreadyDecided,
                None => application_not_found(decided.id),
            });
        };

        let application = ReviewerApplication::try_from(updated)?;
        if application.status == ApplicationStatus::Approved {
            // Admins keep their role
            let promoted =
                sqlx::query("UPDATE users SET role = 'reviewer' WHERE id = $1 AND role = 'user'")
                    .bind(application.user_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            debug!(
                promoted = promoted.rows_affected(),
                "applicant role updated"
            );
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgApplicationRepository>();
    }
}
