//! User aggregate - per-user submission counters and moderation role

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Moderation role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Reviewer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Reviewer => "reviewer",
            Self::Admin => "admin",
        }
    }

    /// Reviewers and admins may decide submissions
    #[inline]
    pub fn can_review(&self) -> bool {
        matches!(self, Self::Reviewer | Self::Admin)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "reviewer" => Ok(Self::Reviewer),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::ValidationError(format!("unknown role: {other}"))),
        }
    }
}

/// Aggregate statistics for a contributor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAggregate {
    pub id: Snowflake,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub submissions_count: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
}

impl UserAggregate {
    pub fn new(id: Snowflake, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            role: Role::User,
            created_at,
            submissions_count: 0,
            approved_count: 0,
            rejected_count: 0,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Whole days since the account was created, never negative
    pub fn account_age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days().max(0)
    }

    /// Submissions that have reached a decision
    #[inline]
    pub fn decided_count(&self) -> i64 {
        self.approved_count + self.rejected_count
    }
}

/// The authenticated caller of a moderation operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Snowflake,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Snowflake, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    /// Fail unless the actor may act as a reviewer
    pub fn require_reviewer(&self) -> Result<(), DomainError> {
        if self.role.can_review() {
            Ok(())
        } else {
            Err(DomainError::InsufficientRole("reviewer"))
        }
    }

    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(DomainError::InsufficientRole("admin"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("reviewer".parse::<Role>().unwrap(), Role::Reviewer);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("moderator".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_permissions() {
        assert!(!Role::User.can_review());
        assert!(Role::Reviewer.can_review());
        assert!(Role::Admin.can_review());
        assert!(!Role::Reviewer.is_admin());
    }

    #[test]
    fn test_account_age_days() {
        let now = Utc::now();
        let user = UserAggregate::new(Snowflake::new(1), "ada", now - Duration::hours(50));
        assert_eq!(user.account_age_days(now), 2);

        let future = UserAggregate::new(Snowflake::new(2), "bob", now + Duration::days(1));
        assert_eq!(future.account_age_days(now), 0);
    }

    #[test]
    fn test_actor_role_checks() {
        let user = Actor::new(Snowflake::new(1), "ada", Role::User);
        assert!(matches!(
            user.require_reviewer(),
            Err(DomainError::InsufficientRole("reviewer"))
        ));
        let admin = Actor::new(Snowflake::new(2), "root", Role::Admin);
        assert!(admin.require_reviewer().is_ok());
        assert!(admin.require_admin().is_ok());
    }
}
