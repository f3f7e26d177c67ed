//! Reviewer application entity <-> model mapper

use curator_core::entities::ReviewerApplication;
use curator_core::{DomainError, Snowflake};

use super::parse_column;
use crate::models::ApplicationModel;

impl TryFrom<ApplicationModel> for ReviewerApplication {
    type Error = DomainError;

    fn try_from(model: ApplicationModel) -> Result<Self, Self::Error> {
        Ok(ReviewerApplication {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            motivation: model.motivation,
            experience: model.experience,
            status: parse_column(&model.status, "reviewer_applications.status")?,
            created_at: model.created_at,
            decided_at: model.decided_at,
            decided_by: model.decided_by.map(Snowflake::new),
            admin_notes: model.admin_notes,
        })
    }
}
