//! User entity <-> model mapper

use curator_core::entities::UserAggregate;
use curator_core::{DomainError, Snowflake};

use super::parse_column;
use crate::models::UserModel;

impl TryFrom<UserModel> for UserAggregate {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(UserAggregate {
            id: Snowflake::new(model.id),
            name: model.name,
            role: parse_column(&model.role, "role")?,
            created_at: model.created_at,
            submissions_count: model.submissions_count,
            approved_count: model.approved_count,
            rejected_count: model.rejected_count,
        })
    }
}
