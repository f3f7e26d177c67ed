//! PostgreSQL implementation of SubmissionRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, instrument};

use curator_core::entities::{CommitEffect, DecisionCommit, FaqEntry, Game, Submission};
use curator_core::traits::{PendingFilter, RepoResult, SubmissionRepository};
use curator_core::value_objects::{FieldValue, Snowflake};
use curator_core::DomainError;

use crate::mappers::{fields_to_json, AuditInsert, ReviewUpdate, SubmissionInsert};
use crate::models::{GameModel, SubmissionModel};

use super::error::{
    game_not_found, map_db_error, map_insert_error, map_unique_violation, submission_not_found,
};

/// PostgreSQL implementation of SubmissionRepository
#[derive(Clone)]
pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Submission>> {
        let result = sqlx::query_as::<_, SubmissionModel>(&format!(
            "SELECT {} FROM submissions WHERE id = $1",
            SubmissionModel::COLUMNS
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Submission::try_from).transpose()
    }

    #[instrument(skip(self, submission), fields(submission_id = %submission.id, kind = %submission.kind()))]
    async fn create(&self, submission: &Submission) -> RepoResult<()> {
        let insert = SubmissionInsert::new(submission)?;
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO submissions (
                id, kind, target_game_id, target_slug, submitter_id, submitter_name,
                submitted_at, payload, justification, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
            ",
        )
        .bind(insert.id)
        .bind(insert.kind)
        .bind(insert.target_game_id)
        .bind(insert.target_slug)
        .bind(insert.submitter_id)
        .bind(insert.submitter_name)
        .bind(submission.submitted_at)
        .bind(insert.payload)
        .bind(insert.justification)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                "submissions_submitter_id_fkey",
                submission.submitter_id,
                || {
                    DomainError::ValidationError(format!(
                        "submission {} already exists",
                        submission.id
                    ))
                },
            )
        })?;

        sqlx::query("UPDATE users SET submissions_count = submissions_count + 1 WHERE id = $1")
            .bind(insert.submitter_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_pending(&self, filter: &PendingFilter) -> RepoResult<Vec<Submission>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM submissions WHERE status = 'pending'",
            SubmissionModel::COLUMNS
        ));

        if let Some(kind) = filter.kind {
            builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(submitter_id) = filter.submitter_id {
            builder
                .push(" AND submitter_id = ")
                .push_bind(submitter_id.into_inner());
        }
        if let Some(target_id) = filter.target_id {
            builder
                .push(" AND target_game_id = ")
                .push_bind(target_id.into_inner());
        }
        builder.push(" ORDER BY submitted_at ASC, id ASC");
        if let Some(limit) = filter.effective_limit() {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let results = builder
            .build_query_as::<SubmissionModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        results.into_iter().map(Submission::try_from).collect()
    }

    #[instrument(
        skip(self, commit),
        fields(submission_id = %commit.submission.id, status = %commit.status())
    )]
    async fn set_decision(&self, commit: &DecisionCommit) -> RepoResult<Submission> {
        let update = ReviewUpdate::new(&commit.submission)?;
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Compare-and-set: only a pending row can be decided
        let decided = sqlx::query_as::<_, SubmissionModel>(&format!(
            r"
            UPDATE submissions
            SET status = $2, reviewer_id = $3, reviewer_name = $4, decided_at = $5,
                review_notes = $6, final_value = $7
            WHERE id = $1 AND status = 'pending'
            RETURNING {}
            ",
            SubmissionModel::COLUMNS
        ))
        .bind(update.id)
        .bind(update.status)
        .bind(update.reviewer_id)
        .bind(update.reviewer_name)
        .bind(update.decided_at)
        .bind(update.review_notes)
        .bind(update.final_value)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(decided) = decided else {
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT id FROM submissions WHERE id = $1")
                    .bind(update.id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            debug!(exists = exists.is_some(), "decision lost compare-and-set");
            return Err(match exists {
                Some(_) => DomainError::AlreadyProcessed,
                None => submission_not_found(commit.submission.id),
            });
        };

        let counter = if commit.status().counts_as_approved() {
            "UPDATE users SET approved_count = approved_count + 1 WHERE id = $1"
        } else {
            "UPDATE users SET rejected_count = rejected_count + 1 WHERE id = $1"
        };
        sqlx::query(counter)
            .bind(decided.submitter_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let mut audit_entry = commit.audit.clone();
        match &commit.effect {
            CommitEffect::None => {}
            CommitEffect::WriteGameFields { game_id, fields } => {
                let before = write_game_fields(&mut tx, *game_id, fields).await?;
                audit_entry = commit.audit_against(&before);
            }
            CommitEffect::CreateGame { game } => create_game(&mut tx, game).await?,
            CommitEffect::PublishFaq { entry } => publish_faq(&mut tx, entry).await?,
        }

        let audit = AuditInsert::new(&audit_entry)?;
        sqlx::query(
            r"
            INSERT INTO audit_log (
                id, submission_id, target_game_id, target_slug, field, old_value, new_value,
                reviewer_id, reviewer_name, reviewer_role, submitter_id, submitter_name,
                status, notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(audit.id)
        .bind(audit.submission_id)
        .bind(audit.target_game_id)
        .bind(audit.target_slug)
        .bind(audit.field)
        .bind(audit.old_value)
        .bind(audit.new_value)
        .bind(audit.reviewer_id)
        .bind(audit.reviewer_name)
        .bind(audit.reviewer_role)
        .bind(audit.submitter_id)
        .bind(audit.submitter_name)
        .bind(audit.status)
        .bind(audit.notes)
        .bind(commit.audit.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Submission::try_from(decided)
    }
}

/// Apply field writes to a locked game row; returns the row as it was
/// before the writes
async fn write_game_fields(
    tx: &mut Transaction<'_, Postgres>,
    game_id: Snowflake,
    fields: &[(String, FieldValue)],
) -> RepoResult<Game> {
    let model = sqlx::query_as::<_, GameModel>(
        "SELECT id, slug, title, fields, created_at, updated_at FROM games WHERE id = $1 FOR UPDATE",
    )
    .bind(game_id.into_inner())
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_db_error)?
    .ok_or_else(|| game_not_found(game_id))?;

    let before = Game::try_from(model)?;
    let mut game = before.clone();
    for (field, value) in fields {
        game.set_field(field, value.clone());
    }

    sqlx::query("UPDATE games SET title = $2, fields = $3, updated_at = $4 WHERE id = $1")
        .bind(game_id.into_inner())
        .bind(&game.title)
        .bind(fields_to_json(&game.fields)?)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

    Ok(before)
}

/// Insert a game created by an approved game submission
async fn create_game(tx: &mut Transaction<'_, Postgres>, game: &Game) -> RepoResult<()> {
    let mut game = game.clone();
    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM games WHERE slug = $1")
        .bind(&game.slug)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?;
    if taken.is_some() {
        game.disambiguate_slug();
    }

    sqlx::query(
        r"
        INSERT INTO games (id, slug, title, fields, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(game.id.into_inner())
    .bind(&game.slug)
    .bind(&game.title)
    .bind(fields_to_json(&game.fields)?)
    .bind(game.created_at)
    .bind(game.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_unique_violation(e, || DomainError::GameSlugExists(game.slug.clone())))?;

    Ok(())
}

async fn publish_faq(tx: &mut Transaction<'_, Postgres>, entry: &FaqEntry) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO faq_entries (id, question, answer, category, source_submission_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(entry.id.into_inner())
    .bind(&entry.question)
    .bind(&entry.answer)
    .bind(entry.category.as_deref())
    .bind(entry.source_submission_id.into_inner())
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSubmissionRepository>();
    }
}
