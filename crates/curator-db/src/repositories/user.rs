//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use curator_core::entities::{Role, UserAggregate};
use curator_core::traits::{RepoResult, UserRepository};
use curator_core::value_objects::Snowflake;
use curator_core::DomainError;

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_not_found};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<UserAggregate>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, name, role, created_at, submissions_count, approved_count, rejected_count
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(UserAggregate::try_from).transpose()
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &UserAggregate) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, name, role, created_at, submissions_count, approved_count, rejected_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.submissions_count)
        .bind(user.approved_count)
        .bind(user.rejected_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError(format!("user {} already exists", user.id))
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_role(&self, id: Snowflake, role: Role) -> RepoResult<()> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }
}
