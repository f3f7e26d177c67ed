//! Audit service
//!
//! Read access to the append-only audit log. Entries are only ever written by
//! the submission store as part of a decision commit.

use curator_core::{Actor, AuditLogQuery, DomainError, Snowflake};
use tracing::instrument;

use crate::dto::{AuditLogEntryResponse, AuditLogPageResponse, AuditLogQueryParams};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Audit service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Filtered, sorted page of audit entries
    #[instrument(skip(self, viewer, params), fields(viewer_id = %viewer.id))]
    pub async fn list(
        &self,
        viewer: &Actor,
        params: AuditLogQueryParams,
    ) -> ServiceResult<AuditLogPageResponse> {
        viewer.require_reviewer()?;

        let query = AuditLogQuery::from(params);
        let entries = self.ctx.audit_repo().list(&query).await?;

        Ok(AuditLogPageResponse {
            entries: entries.iter().map(AuditLogEntryResponse::from).collect(),
            limit: query.limit,
            offset: query.offset,
        })
    }

    /// The audit entry written when a submission was decided
    #[instrument(skip(self, viewer))]
    pub async fn for_submission(
        &self,
        viewer: &Actor,
        submission_id: Snowflake,
    ) -> ServiceResult<AuditLogEntryResponse> {
        viewer.require_reviewer()?;

        let entry = self
            .ctx
            .audit_repo()
            .find_by_submission(submission_id)
            .await?
            .ok_or(DomainError::SubmissionNotFound(submission_id))?;
        Ok(AuditLogEntryResponse::from(&entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{CreateCorrectionRequest, ReviewDecisionRequest};
    use crate::services::{ReviewService, SubmissionService};
    use crate::test_support::Harness;
    use curator_core::{AuditSort, FieldValue, ReviewAction, Role};

    async fn decide(
        harness: &Harness,
        submitter: &Actor,
        reviewer: &Actor,
        field: &str,
        value: &str,
        action: ReviewAction,
    ) -> Snowflake {
        let created = SubmissionService::new(&harness.ctx)
            .create_correction(
                submitter,
                CreateCorrectionRequest {
                    game_id: Some(Snowflake::new(100)),
                    game_slug: None,
                    field: field.to_string(),
                    new_value: FieldValue::text(value),
                    justification: None,
                },
            )
            .await
            .unwrap();
        let id = Snowflake::parse(&created.id).unwrap();
        ReviewService::new(&harness.ctx)
            .decide(
                reviewer,
                &ReviewDecisionRequest {
                    submission_id: id,
                    status: action,
                    review_notes: Some("checked against the manual".to_string()),
                    final_value: None,
                    override_self_review: false,
                },
            )
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let harness = Harness::new();
        let ada = harness.user(1, "ada", Role::User).await;
        let rev = harness.user(2, "rev", Role::Reviewer).await;
        let admin = harness.user(3, "root", Role::Admin).await;
        harness.game(100, "Foo").await;

        decide(&harness, &ada, &rev, "developer", "Acme Corp", ReviewAction::Approve).await;
        decide(&harness, &ada, &admin, "publisher", "Globex", ReviewAction::Reject).await;

        let service = AuditService::new(&harness.ctx);
        let all = service.list(&rev, AuditLogQueryParams::default()).await.unwrap();
        assert_eq!(all.entries.len(), 2);
        assert_eq!(all.entries[0].field, "publisher");

        let oldest = service
            .list(
                &rev,
                AuditLogQueryParams {
                    sort: Some(AuditSort::Oldest),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(oldest.entries[0].field, "developer");

        let by_admin = service
            .list(
                &rev,
                AuditLogQueryParams {
                    reviewer_role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_admin.entries.len(), 1);
        assert_eq!(by_admin.entries[0].reviewer_name, "root");

        let search = service
            .list(
                &rev,
                AuditLogQueryParams {
                    q: Some("GLOBEX".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(search.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_requires_reviewer() {
        let harness = Harness::new();
        let ada = harness.user(1, "ada", Role::User).await;

        let err = AuditService::new(&harness.ctx)
            .list(&ada, AuditLogQueryParams::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_for_submission() {
        let harness = Harness::new();
        let ada = harness.user(1, "ada", Role::User).await;
        let rev = harness.user(2, "rev", Role::Reviewer).await;
        harness.game(100, "Foo").await;

        let id = decide(
            &harness,
            &ada,
            &rev,
            "developer",
            "Acme Corp",
            ReviewAction::Approve,
        )
        .await;
        let entry = AuditService::new(&harness.ctx).for_submission(&rev, id).await.unwrap();
        assert_eq!(entry.submission_id, id.to_string());
        assert_eq!(entry.submitter_id.as_deref(), Some("1"));

        let missing = AuditService::new(&harness.ctx)
            .for_submission(&rev, Snowflake::new(5))
            .await
            .unwrap_err();
        assert_eq!(missing.status_code(), 404);
    }
}
