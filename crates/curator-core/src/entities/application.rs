//! Reviewer application - a user's request to join the moderation pool

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

pub const MIN_APPLICATION_TEXT_LEN: usize = 10;
pub const MAX_APPLICATION_TEXT_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(DomainError::ValidationError(format!(
                "unknown application status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerApplication {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub motivation: String,
    pub experience: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<Snowflake>,
    pub admin_notes: Option<String>,
}

impl ReviewerApplication {
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        motivation: impl Into<String>,
        experience: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let motivation = motivation.into().trim().to_string();
        let experience = experience.into().trim().to_string();
        check_text("motivation", &motivation)?;
        check_text("experience", &experience)?;

        Ok(Self {
            id,
            user_id,
            motivation,
            experience,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
            decided_by: None,
            admin_notes: None,
        })
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }

    /// Apply an admin decision. Only a pending application can be decided.
    pub fn apply_decision(
        &mut self,
        admin_id: Snowflake,
        decision: &ApplicationDecision,
        decided_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if !self.is_pending() {
            return Err(DomainError::ApplicationAlreadyDecided);
        }
        self.status = decision.status;
        self.decided_at = Some(decided_at);
        self.decided_by = Some(admin_id);
        self.admin_notes = decision.admin_notes.clone();
        Ok(())
    }
}

/// Admin verdict on a reviewer application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDecision {
    pub status: ApplicationStatus,
    pub admin_notes: Option<String>,
}

impl ApplicationDecision {
    pub fn new(status: ApplicationStatus, admin_notes: Option<String>) -> Result<Self, DomainError> {
        let admin_notes = admin_notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        match status {
            ApplicationStatus::Pending => {
                return Err(DomainError::ValidationError(
                    "decision must approve or reject".to_string(),
                ));
            }
            ApplicationStatus::Rejected if admin_notes.is_none() => {
                return Err(DomainError::MissingReviewNotes);
            }
            _ => {}
        }
        if admin_notes
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_APPLICATION_TEXT_LEN)
        {
            return Err(DomainError::ContentTooLong {
                field: "admin_notes",
                max: MAX_APPLICATION_TEXT_LEN,
            });
        }

        Ok(Self {
            status,
            admin_notes,
        })
    }

    #[inline]
    pub fn is_approval(&self) -> bool {
        self.status == ApplicationStatus::Approved
    }
}

fn check_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len < MIN_APPLICATION_TEXT_LEN {
        return Err(DomainError::ContentTooShort {
            field,
            min: MIN_APPLICATION_TEXT_LEN,
        });
    }
    if len > MAX_APPLICATION_TEXT_LEN {
        return Err(DomainError::ContentTooLong {
            field,
            max: MAX_APPLICATION_TEXT_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> ReviewerApplication {
        ReviewerApplication::new(
            Snowflake::new(1),
            Snowflake::new(2),
            "I fix release dates all the time",
            "Two years of wiki editing",
        )
        .unwrap()
    }

    #[test]
    fn test_text_length_bounds() {
        let err = ReviewerApplication::new(Snowflake::new(1), Snowflake::new(2), "short", "long enough text")
            .unwrap_err();
        assert!(matches!(err, DomainError::ContentTooShort { field: "motivation", .. }));

        let err = ReviewerApplication::new(
            Snowflake::new(1),
            Snowflake::new(2),
            "long enough text",
            "x".repeat(MAX_APPLICATION_TEXT_LEN + 1),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::ContentTooLong { field: "experience", .. }));
    }

    #[test]
    fn test_reject_requires_notes() {
        assert!(matches!(
            ApplicationDecision::new(ApplicationStatus::Rejected, Some(" ".into())),
            Err(DomainError::MissingReviewNotes)
        ));
        assert!(ApplicationDecision::new(ApplicationStatus::Approved, None).is_ok());
        assert!(ApplicationDecision::new(ApplicationStatus::Pending, None).is_err());
    }

    #[test]
    fn test_decide_once() {
        let mut app = application();
        let decision = ApplicationDecision::new(ApplicationStatus::Approved, None).unwrap();
        app.apply_decision(Snowflake::new(9), &decision, Utc::now()).unwrap();
        assert_eq!(app.status, ApplicationStatus::Approved);
        assert_eq!(app.decided_by, Some(Snowflake::new(9)));

        let err = app
            .apply_decision(Snowflake::new(9), &decision, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::ApplicationAlreadyDecided));
    }
}
