//! Review service
//!
//! Drives the `pending -> approved | rejected | modified` transition. Every
//! decision is validated in full before it reaches the store, and the store's
//! compare-and-set decides which of several concurrent reviewers wins.

use chrono::Utc;
use curator_core::events::SubmissionDecidedEvent;
use curator_core::{
    Actor, Decision, DecisionCommit, DomainError, ModerationEvent, ReviewAction, Submission,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    BatchDecisionResponse, BatchErrorDetail, BatchItemResult, BatchOutcome, ReviewDecisionRequest,
    SetAllActionsRequest, SubmissionResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Review service
pub struct ReviewService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReviewService<'a> {
    /// Create a new ReviewService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Decide one submission
    #[instrument(
        skip(self, reviewer, request),
        fields(reviewer_id = %reviewer.id, submission_id = %request.submission_id)
    )]
    pub async fn decide(
        &self,
        reviewer: &Actor,
        request: &ReviewDecisionRequest,
    ) -> ServiceResult<SubmissionResponse> {
        let decided = self.decide_single(reviewer, request).await?;
        Ok(SubmissionResponse::from(&decided))
    }

    /// Decide several submissions independently.
    ///
    /// Items already committed stay committed when a later item fails; each
    /// item reports its own outcome.
    #[instrument(
        skip(self, reviewer, requests),
        fields(reviewer_id = %reviewer.id, count = requests.len())
    )]
    pub async fn decide_batch(
        &self,
        reviewer: &Actor,
        requests: &[ReviewDecisionRequest],
    ) -> ServiceResult<BatchDecisionResponse> {
        reviewer.require_reviewer()?;

        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            let result = match self.decide_single(reviewer, request).await {
                Ok(decided) => BatchItemResult {
                    submission_id: request.submission_id.to_string(),
                    outcome: BatchOutcome::Committed,
                    submission: Some(SubmissionResponse::from(&decided)),
                    error: None,
                },
                Err(e) => BatchItemResult {
                    submission_id: request.submission_id.to_string(),
                    outcome: BatchOutcome::from_status(e.status_code()),
                    submission: None,
                    error: Some(BatchErrorDetail {
                        code: e.error_code().to_string(),
                        message: e.to_string(),
                    }),
                },
            };
            results.push(result);
        }

        let response = BatchDecisionResponse::new(results);
        info!(
            committed = response.committed,
            failed = response.failed,
            "Batch decision finished"
        );
        Ok(response)
    }

    /// Apply one action and shared notes to every listed submission
    #[instrument(skip(self, reviewer, request), fields(reviewer_id = %reviewer.id))]
    pub async fn set_all_actions(
        &self,
        reviewer: &Actor,
        request: &SetAllActionsRequest,
    ) -> ServiceResult<BatchDecisionResponse> {
        if request.status == ReviewAction::Modify {
            return Err(ServiceError::validation(
                "modified decisions need a final value per submission",
            ));
        }

        let requests: Vec<ReviewDecisionRequest> = request
            .submission_ids
            .iter()
            .map(|&submission_id| ReviewDecisionRequest {
                submission_id,
                status: request.status,
                review_notes: request.review_notes.clone(),
                final_value: None,
                override_self_review: false,
            })
            .collect();

        self.decide_batch(reviewer, &requests).await
    }

    async fn decide_single(
        &self,
        reviewer: &Actor,
        request: &ReviewDecisionRequest,
    ) -> ServiceResult<Submission> {
        reviewer.require_reviewer()?;
        let decision = Decision::new(
            request.status,
            request.review_notes.clone(),
            request.final_value.clone(),
        )?;

        let submission = self
            .ctx
            .submission_repo()
            .find_by_id(request.submission_id)
            .await?
            .ok_or(DomainError::SubmissionNotFound(request.submission_id))?;

        if !submission.is_pending() {
            return Err(DomainError::AlreadyProcessed.into());
        }
        submission.ensure_reviewable_by(reviewer, request.override_self_review)?;

        let commit = DecisionCommit::prepare(
            &submission,
            reviewer,
            &decision,
            Utc::now(),
            self.ctx.generate_id(),
            self.ctx.generate_id(),
        )?;

        let decided = match self
            .ctx
            .store(self.ctx.submission_repo().set_decision(&commit))
            .await
        {
            Ok(decided) => decided,
            Err(e) => {
                if e.as_domain().is_some_and(DomainError::is_conflict) {
                    warn!(submission_id = %submission.id, error = %e, "Decision lost the race");
                }
                return Err(e);
            }
        };

        info!(
            submission_id = %decided.id,
            reviewer_id = %reviewer.id,
            status = %decided.status,
            "Decision committed"
        );

        self.ctx
            .notify(ModerationEvent::SubmissionDecided(SubmissionDecidedEvent {
                submission_id: decided.id,
                submitter_id: decided.submitter_id,
                reviewer_id: reviewer.id,
                status: decided.status,
                timestamp: Utc::now(),
            }));

        Ok(decided)
    }
}
