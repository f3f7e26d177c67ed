//! Submission service
//!
//! Intake of corrections, game submissions and FAQ submissions, single
//! submission lookup, and the grouped review queue.

use curator_core::events::SubmissionCreatedEvent;
use curator_core::{
    group_submissions, Actor, DomainError, FaqProposal, FieldChange, FieldValue, Game,
    GameProposal, ModerationEvent, PendingFilter, Snowflake, Submission, SubmissionPayload,
    TargetRef,
};
use tracing::{info, instrument};

use crate::dto::{
    CreateCorrectionRequest, CreateFaqSubmissionRequest, CreateGameSubmissionRequest,
    ReviewQueueItemResponse, ReviewQueueQuery, ReviewQueueResponse, SubmissionResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::user::UserService;

/// Submission service
pub struct SubmissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SubmissionService<'a> {
    /// Create a new SubmissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Propose a change to one field of a game.
    ///
    /// The current value is captured as the correction's old value.
    #[instrument(skip(self, submitter, request), fields(submitter_id = %submitter.id))]
    pub async fn create_correction(
        &self,
        submitter: &Actor,
        request: CreateCorrectionRequest,
    ) -> ServiceResult<SubmissionResponse> {
        let game = self
            .resolve_game(request.game_id, request.game_slug.as_deref())
            .await?
            .ok_or_else(|| {
                DomainError::InvalidTarget("either game_id or game_slug is required".to_string())
            })?;

        let old_value = game.field_value(&request.field);
        let payload = SubmissionPayload::Correction(FieldChange::new(
            request.field,
            old_value,
            request.new_value,
        ));

        self.intake(submitter, Some(target_of(&game)), payload, request.justification)
            .await
    }

    /// Propose a new game, or edits to the targeted one
    #[instrument(skip(self, submitter, request), fields(submitter_id = %submitter.id))]
    pub async fn create_game_submission(
        &self,
        submitter: &Actor,
        request: CreateGameSubmissionRequest,
    ) -> ServiceResult<SubmissionResponse> {
        let game = self
            .resolve_game(request.game_id, request.game_slug.as_deref())
            .await?;

        let changes = request
            .fields
            .into_iter()
            .map(|proposed| {
                let old_value = game
                    .as_ref()
                    .map_or(FieldValue::Clear, |g| g.field_value(&proposed.field));
                FieldChange::new(proposed.field, old_value, proposed.value)
            })
            .collect();
        let payload = SubmissionPayload::Game(GameProposal {
            title: request.title,
            changes,
        });

        self.intake(
            submitter,
            game.as_ref().map(target_of),
            payload,
            request.justification,
        )
        .await
    }

    /// Propose a new FAQ entry
    #[instrument(skip(self, submitter, request), fields(submitter_id = %submitter.id))]
    pub async fn create_faq_submission(
        &self,
        submitter: &Actor,
        request: CreateFaqSubmissionRequest,
    ) -> ServiceResult<SubmissionResponse> {
        let payload = SubmissionPayload::Faq(FaqProposal {
            question: request.question.trim().to_string(),
            answer: request.answer.trim().to_string(),
            category: request
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        });

        self.intake(submitter, None, payload, request.justification)
            .await
    }

    /// Fetch one submission. Only its submitter and reviewers can see it.
    #[instrument(skip(self, viewer))]
    pub async fn get(&self, viewer: &Actor, id: Snowflake) -> ServiceResult<SubmissionResponse> {
        let submission = self
            .ctx
            .submission_repo()
            .find_by_id(id)
            .await?
            .filter(|s| s.submitter_id == viewer.id || viewer.role.can_review())
            .ok_or(DomainError::SubmissionNotFound(id))?;

        Ok(SubmissionResponse::from(&submission))
    }

    /// Pending work grouped into standalone items and batches.
    ///
    /// The whole filtered pending set is grouped before the page is cut, so a
    /// batch is never split across pages.
    #[instrument(skip(self, reviewer, query), fields(reviewer_id = %reviewer.id))]
    pub async fn review_queue(
        &self,
        reviewer: &Actor,
        query: &ReviewQueueQuery,
    ) -> ServiceResult<ReviewQueueResponse> {
        reviewer.require_reviewer()?;

        let filter = PendingFilter::from(query);
        let pending = self.ctx.submission_repo().list_pending(&filter).await?;
        let items = group_submissions(&pending);
        let (offset, limit) = query.page();

        Ok(ReviewQueueResponse {
            total_items: items.len(),
            total_submissions: pending.len(),
            items: items
                .iter()
                .skip(offset)
                .take(limit)
                .map(ReviewQueueItemResponse::from)
                .collect(),
        })
    }

    /// Look a game up by id, falling back to slug; `Ok(None)` when neither is given
    async fn resolve_game(
        &self,
        game_id: Option<Snowflake>,
        slug: Option<&str>,
    ) -> ServiceResult<Option<Game>> {
        let game = match (game_id, slug) {
            (Some(id), _) => self
                .ctx
                .game_repo()
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::InvalidTarget(format!("unknown game {id}")))?,
            (None, Some(slug)) => self
                .ctx
                .game_repo()
                .find_by_slug(slug.trim())
                .await?
                .ok_or_else(|| DomainError::InvalidTarget(format!("unknown game {slug}")))?,
            (None, None) => return Ok(None),
        };
        Ok(Some(game))
    }

    async fn intake(
        &self,
        submitter: &Actor,
        target: Option<TargetRef>,
        payload: SubmissionPayload,
        justification: Option<String>,
    ) -> ServiceResult<SubmissionResponse> {
        let submission = Submission::new(
            self.ctx.generate_id(),
            submitter,
            target,
            payload,
            justification,
        )?;

        UserService::new(self.ctx).ensure(submitter).await?;
        self.ctx
            .store(self.ctx.submission_repo().create(&submission))
            .await?;

        info!(
            submission_id = %submission.id,
            kind = %submission.kind(),
            target_id = ?submission.target_id(),
            "Submission created"
        );

        self.ctx
            .notify(ModerationEvent::SubmissionCreated(SubmissionCreatedEvent {
                submission_id: submission.id,
                kind: submission.kind(),
                submitter_id: submission.submitter_id,
                target_id: submission.target_id(),
                timestamp: submission.submitted_at,
            }));

        Ok(SubmissionResponse::from(&submission))
    }
}

fn target_of(game: &Game) -> TargetRef {
    TargetRef {
        game_id: game.id,
        slug: game.slug.clone(),
    }
}
