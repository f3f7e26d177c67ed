//! Reviewer application service
//!
//! Eligibility reports, the re-application cooldown, and the
//! `pending -> approved | rejected` lifecycle of reviewer applications.

use chrono::Utc;
use curator_core::events::{ApplicationCreatedEvent, ApplicationDecidedEvent};
use curator_core::{
    can_reapply, evaluate_eligibility, Actor, ApplicationDecision, ApplicationStanding,
    DomainError, EligibilityReport, ModerationEvent, ReapplyCheck, ReviewerApplication, Role,
    Snowflake,
};
use tracing::{info, instrument};

use crate::dto::{
    ApplicationResponse, CreateApplicationRequest, CurrentApplicationResponse,
    DecideApplicationRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::user::UserService;

/// Reviewer application service
pub struct ApplicationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ApplicationService<'a> {
    /// Create a new ApplicationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Evaluate the caller against the configured thresholds and their
    /// application history
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn eligibility(&self, actor: &Actor) -> ServiceResult<EligibilityReport> {
        let user = UserService::new(self.ctx).ensure(actor).await?;
        let has_pending = self.ctx.application_repo().has_pending(user.id).await?;
        let reapply = self.reapply_check(user.id).await?;
        Ok(evaluate_eligibility(
            &user,
            &ApplicationStanding::new(has_pending, &reapply),
            self.ctx.thresholds(),
            Utc::now(),
        ))
    }

    /// Cooldown status after the caller's most recent rejection
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn reapply_status(&self, actor: &Actor) -> ServiceResult<ReapplyCheck> {
        self.reapply_check(actor.id).await
    }

    /// Submit an application.
    ///
    /// Checks run in order: role, pending application, cooldown, eligibility.
    #[instrument(skip(self, actor, request), fields(user_id = %actor.id))]
    pub async fn create_application(
        &self,
        actor: &Actor,
        request: CreateApplicationRequest,
    ) -> ServiceResult<ApplicationResponse> {
        let user = UserService::new(self.ctx).ensure(actor).await?;
        if user.role != Role::User {
            return Err(DomainError::AlreadyReviewer.into());
        }

        if self.ctx.application_repo().has_pending(user.id).await? {
            return Err(DomainError::PendingApplicationExists.into());
        }

        let reapply = self.reapply_check(user.id).await?;
        if let (false, Some(days_remaining)) = (reapply.can_reapply, reapply.days_until_reapply) {
            return Err(DomainError::ReapplyCooldown { days_remaining }.into());
        }

        // Pending and cooldown were rejected above with their own errors
        let report = evaluate_eligibility(
            &user,
            &ApplicationStanding::default(),
            self.ctx.thresholds(),
            Utc::now(),
        );
        if !report.eligible {
            return Err(DomainError::NotEligible(report.missing_requirements).into());
        }

        let application = ReviewerApplication::new(
            self.ctx.generate_id(),
            user.id,
            request.motivation,
            request.experience,
        )?;
        self.ctx
            .store(self.ctx.application_repo().create(&application))
            .await?;

        info!(application_id = %application.id, "Reviewer application submitted");
        self.ctx
            .notify(ModerationEvent::ApplicationCreated(ApplicationCreatedEvent {
                application_id: application.id,
                user_id: application.user_id,
                timestamp: application.created_at,
            }));

        Ok(ApplicationResponse::from(&application))
    }

    /// The caller's most recent application
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn current_application(
        &self,
        actor: &Actor,
    ) -> ServiceResult<CurrentApplicationResponse> {
        let latest = self.ctx.application_repo().latest_by_user(actor.id).await?;
        Ok(CurrentApplicationResponse {
            application: latest.as_ref().map(ApplicationResponse::from),
        })
    }

    /// All of the caller's applications, newest first
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn application_history(
        &self,
        actor: &Actor,
    ) -> ServiceResult<Vec<ApplicationResponse>> {
        let applications = self.ctx.application_repo().find_by_user(actor.id).await?;
        Ok(applications.iter().map(ApplicationResponse::from).collect())
    }

    /// Pending applications, oldest first (admin)
    #[instrument(skip(self, admin), fields(admin_id = %admin.id))]
    pub async fn list_pending(
        &self,
        admin: &Actor,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<ApplicationResponse>> {
        admin.require_admin()?;
        let applications = self
            .ctx
            .application_repo()
            .list_pending(limit.unwrap_or(100))
            .await?;
        Ok(applications.iter().map(ApplicationResponse::from).collect())
    }

    /// Approve or reject an application (admin). Approval promotes the
    /// applicant to reviewer in the same store operation.
    #[instrument(skip(self, admin, request), fields(admin_id = %admin.id))]
    pub async fn decide_application(
        &self,
        admin: &Actor,
        application_id: Snowflake,
        request: DecideApplicationRequest,
    ) -> ServiceResult<ApplicationResponse> {
        admin.require_admin()?;
        let decision = ApplicationDecision::new(request.status, request.admin_notes)?;

        let mut application = self
            .ctx
            .application_repo()
            .find_by_id(application_id)
            .await?
            .ok_or(DomainError::ApplicationNotFound(application_id))?;
        application.apply_decision(admin.id, &decision, Utc::now())?;

        let decided = self
            .ctx
            .store(self.ctx.application_repo().decide(&application))
            .await?;

        info!(
            application_id = %decided.id,
            user_id = %decided.user_id,
            status = %decided.status,
            "Reviewer application decided"
        );
        self.ctx
            .notify(ModerationEvent::ApplicationDecided(ApplicationDecidedEvent {
                application_id: decided.id,
                user_id: decided.user_id,
                admin_id: admin.id,
                status: decided.status,
                timestamp: Utc::now(),
            }));

        Ok(ApplicationResponse::from(&decided))
    }

    async fn reapply_check(&self, user_id: Snowflake) -> ServiceResult<ReapplyCheck> {
        let last_rejected_at = self
            .ctx
            .application_repo()
            .latest_rejected(user_id)
            .await?
            .and_then(|a| a.decided_at);
        Ok(can_reapply(
            last_rejected_at,
            self.ctx.thresholds().reapply_cooldown_days,
            Utc::now(),
        ))
    }
}
