//! PostgreSQL implementation of GameRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use curator_core::entities::Game;
use curator_core::traits::{GameRepository, RepoResult};
use curator_core::value_objects::Snowflake;
use curator_core::DomainError;

use crate::mappers::fields_to_json;
use crate::models::GameModel;

use super::error::{map_db_error, map_unique_violation};

const GAME_COLUMNS: &str = "id, slug, title, fields, created_at, updated_at";

/// PostgreSQL implementation of GameRepository
#[derive(Clone)]
pub struct PgGameRepository {
    pool: PgPool,
}

impl PgGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameRepository for PgGameRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Game>> {
        let result = sqlx::query_as::<_, GameModel>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Game::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Game>> {
        let result = sqlx::query_as::<_, GameModel>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Game::try_from).transpose()
    }

    #[instrument(skip(self, game), fields(game_id = %game.id, slug = %game.slug))]
    async fn create(&self, game: &Game) -> RepoResult<()> {
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
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::GameSlugExists(game.slug.clone())))?;

        Ok(())
    }
}
