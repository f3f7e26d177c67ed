//! Submission entity - a proposed change awaiting (or past) moderation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::decision::{Decision, ReviewAction};
use super::game::TITLE_FIELD;
use super::user::Actor;
use crate::error::DomainError;
use crate::value_objects::{FieldValue, Snowflake};

pub const MAX_FIELD_NAME_LEN: usize = 64;
pub const MAX_VALUE_LEN: usize = 5000;
pub const MAX_JUSTIFICATION_LEN: usize = 2000;
pub const MAX_REVIEW_NOTES_LEN: usize = 2000;
pub const MAX_FAQ_QUESTION_LEN: usize = 500;
pub const MAX_FAQ_ANSWER_LEN: usize = 5000;
pub const MAX_GAME_CHANGES: usize = 50;

// ============================================================================
// Kind / Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Correction,
    GameSubmission,
    FaqSubmission,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correction => "correction",
            Self::GameSubmission => "game_submission",
            Self::FaqSubmission => "faq_submission",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correction" => Ok(Self::Correction),
            "game_submission" => Ok(Self::GameSubmission),
            "faq_submission" => Ok(Self::FaqSubmission),
            other => Err(DomainError::ValidationError(format!(
                "unknown submission kind: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Modified,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Modified => "modified",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Approved and modified both count toward the submitter's approvals
    #[inline]
    pub fn counts_as_approved(&self) -> bool {
        matches!(self, Self::Approved | Self::Modified)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "modified" => Ok(Self::Modified),
            other => Err(DomainError::ValidationError(format!(
                "unknown submission status: {other}"
            ))),
        }
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Reference to the game a submission targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub game_id: Snowflake,
    pub slug: String,
}

/// One field edit: the value at intake time and the proposed replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
}

impl FieldChange {
    pub fn new(field: impl Into<String>, old_value: FieldValue, new_value: FieldValue) -> Self {
        Self {
            field: field.into(),
            old_value,
            new_value,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_field_name(&self.field)?;
        validate_value(&self.field, &self.new_value)?;
        if self.new_value == self.old_value {
            return Err(DomainError::ValidationError(format!(
                "new value for {} is identical to the current value",
                self.field
            )));
        }
        Ok(())
    }
}

/// A proposed new game, or a set of edits to an existing one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProposal {
    pub title: String,
    #[serde(default)]
    pub changes: Vec<FieldChange>,
}

impl GameProposal {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("title", &self.title, MAX_VALUE_LEN)?;
        if self.changes.len() > MAX_GAME_CHANGES {
            return Err(DomainError::ValidationError(format!(
                "at most {MAX_GAME_CHANGES} field changes per game submission"
            )));
        }
        for change in &self.changes {
            validate_field_name(&change.field)?;
            validate_value(&change.field, &change.new_value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqProposal {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FaqProposal {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("question", &self.question, MAX_FAQ_QUESTION_LEN)?;
        require_text("answer", &self.answer, MAX_FAQ_ANSWER_LEN)?;
        if let Some(category) = &self.category {
            if category.chars().count() > MAX_FIELD_NAME_LEN {
                return Err(DomainError::ContentTooLong {
                    field: "category",
                    max: MAX_FIELD_NAME_LEN,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionPayload {
    Correction(FieldChange),
    #[serde(rename = "game_submission")]
    Game(GameProposal),
    #[serde(rename = "faq_submission")]
    Faq(FaqProposal),
}

impl SubmissionPayload {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            Self::Correction(_) => SubmissionKind::Correction,
            Self::Game(_) => SubmissionKind::GameSubmission,
            Self::Faq(_) => SubmissionKind::FaqSubmission,
        }
    }

    /// Field name recorded in the audit trail
    pub fn audit_field(&self) -> &str {
        match self {
            Self::Correction(change) => &change.field,
            Self::Game(_) => "game",
            Self::Faq(_) => "faq",
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Correction(change) => change.validate(),
            Self::Game(proposal) => proposal.validate(),
            Self::Faq(proposal) => proposal.validate(),
        }
    }
}

/// Reviewer and decision fields, present once the submission leaves `pending`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub reviewer_id: Snowflake,
    pub reviewer_name: String,
    pub decided_at: DateTime<Utc>,
    pub notes: Option<String>,
    /// Only set for `modified` decisions
    pub final_value: Option<FieldValue>,
}

// ============================================================================
// Submission
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: Snowflake,
    pub target: Option<TargetRef>,
    pub submitter_id: Snowflake,
    pub submitter_name: String,
    pub submitted_at: DateTime<Utc>,
    pub payload: SubmissionPayload,
    pub justification: Option<String>,
    pub status: SubmissionStatus,
    pub review: Option<ReviewRecord>,
}

impl Submission {
    /// Build and validate a new pending submission
    pub fn new(
        id: Snowflake,
        submitter: &Actor,
        target: Option<TargetRef>,
        payload: SubmissionPayload,
        justification: Option<String>,
    ) -> Result<Self, DomainError> {
        let justification = justification
            .map(|j| j.trim().to_string())
            .filter(|j| !j.is_empty());
        if let Some(j) = &justification {
            if j.chars().count() > MAX_JUSTIFICATION_LEN {
                return Err(DomainError::ContentTooLong {
                    field: "justification",
                    max: MAX_JUSTIFICATION_LEN,
                });
            }
        }

        match (&payload, &target) {
            (SubmissionPayload::Correction(_), None) => {
                return Err(DomainError::InvalidTarget(
                    "corrections must reference a game".to_string(),
                ));
            }
            (SubmissionPayload::Faq(_), Some(_)) => {
                return Err(DomainError::InvalidTarget(
                    "FAQ submissions cannot reference a game".to_string(),
                ));
            }
            _ => {}
        }
        payload.validate()?;

        Ok(Self {
            id,
            target,
            submitter_id: submitter.id,
            submitter_name: submitter.name.clone(),
            submitted_at: Utc::now(),
            payload,
            justification,
            status: SubmissionStatus::Pending,
            review: None,
        })
    }

    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    #[inline]
    pub fn kind(&self) -> SubmissionKind {
        self.payload.kind()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }

    #[inline]
    pub fn target_id(&self) -> Option<Snowflake> {
        self.target.as_ref().map(|t| t.game_id)
    }

    /// Reject reviewers without the role, and reviewers deciding their own work.
    /// The self-review override is only honored for admins.
    pub fn ensure_reviewable_by(
        &self,
        reviewer: &Actor,
        override_self_review: bool,
    ) -> Result<(), DomainError> {
        reviewer.require_reviewer()?;
        if self.submitter_id == reviewer.id && !(override_self_review && reviewer.role.is_admin())
        {
            return Err(DomainError::SelfReview);
        }
        Ok(())
    }

    /// Move out of `pending`. Fails with `AlreadyProcessed` on a second call.
    pub fn apply_decision(
        &mut self,
        reviewer: &Actor,
        decision: &Decision,
        decided_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if !self.is_pending() {
            return Err(DomainError::AlreadyProcessed);
        }
        decision.check_applicable(self)?;

        self.status = decision.action.status();
        self.review = Some(ReviewRecord {
            reviewer_id: reviewer.id,
            reviewer_name: reviewer.name.clone(),
            decided_at,
            notes: decision.notes.clone(),
            final_value: match decision.action {
                ReviewAction::Modify => decision.final_value.clone(),
                ReviewAction::Approve | ReviewAction::Reject => None,
            },
        });
        Ok(())
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn validate_field_name(field: &str) -> Result<(), DomainError> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(
            "field name is required".to_string(),
        ));
    }
    if trimmed.len() != field.len() {
        return Err(DomainError::ValidationError(
            "field name cannot have surrounding whitespace".to_string(),
        ));
    }
    if field.chars().count() > MAX_FIELD_NAME_LEN {
        return Err(DomainError::ContentTooLong {
            field: "field",
            max: MAX_FIELD_NAME_LEN,
        });
    }
    Ok(())
}

/// Check a value proposed or decided for `field`
pub(crate) fn validate_value(field: &str, value: &FieldValue) -> Result<(), DomainError> {
    if value.is_blank() {
        return Err(DomainError::ValidationError(format!(
            "value for {field} is empty; use an explicit clear instead"
        )));
    }
    if value.char_len() > MAX_VALUE_LEN {
        return Err(DomainError::ContentTooLong {
            field: "value",
            max: MAX_VALUE_LEN,
        });
    }
    if field == TITLE_FIELD && value.as_text().is_none() {
        return Err(DomainError::ValidationError(
            "title must be a non-empty text value".to_string(),
        ));
    }
    Ok(())
}

fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::ValidationError(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(DomainError::ContentTooLong { field, max });
    }
    Ok(())
}
