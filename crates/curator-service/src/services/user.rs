//! User service
//!
//! Callers are identified by their token; the user record holding their
//! counters is created on first contact.

use chrono::Utc;
use curator_core::{Actor, UserAggregate};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load the caller's record, creating it with zeroed counters if missing
    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn ensure(&self, actor: &Actor) -> ServiceResult<UserAggregate> {
        if let Some(user) = self.ctx.user_repo().find_by_id(actor.id).await? {
            return Ok(user);
        }

        let user =
            UserAggregate::new(actor.id, actor.name.clone(), Utc::now()).with_role(actor.role);
        match self.ctx.user_repo().create(&user).await {
            Ok(()) => {
                debug!("Provisioned user record");
                Ok(user)
            }
            // Lost a race with a concurrent first request
            Err(e) => match self.ctx.user_repo().find_by_id(actor.id).await? {
                Some(existing) => Ok(existing),
                None => Err(e.into()),
            },
        }
    }
}
