//! Review decisions and the commit they produce
//!
//! A `DecisionCommit` is everything a store must apply in one unit once the
//! compare-and-set on the submission status succeeds: the decided submission,
//! the canonical-data effect, and the single audit entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::audit_log::AuditLogEntry;
use super::faq::FaqEntry;
use super::game::Game;
use super::submission::{
    validate_value, Submission, SubmissionPayload, SubmissionStatus, MAX_FAQ_ANSWER_LEN,
    MAX_REVIEW_NOTES_LEN,
};
use super::user::Actor;
use crate::error::DomainError;
use crate::value_objects::{FieldValue, Snowflake};

/// Reviewer verdict. Serialized as the resulting status name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewAction {
    #[serde(rename = "approved")]
    Approve,
    #[serde(rename = "rejected")]
    Reject,
    #[serde(rename = "modified")]
    Modify,
}

impl ReviewAction {
    pub fn status(&self) -> SubmissionStatus {
        match self {
            Self::Approve => SubmissionStatus::Approved,
            Self::Reject => SubmissionStatus::Rejected,
            Self::Modify => SubmissionStatus::Modified,
        }
    }
}

/// A validated reviewer decision
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: ReviewAction,
    pub notes: Option<String>,
    pub final_value: Option<FieldValue>,
}

impl Decision {
    /// Validate the free-text requirements of a decision.
    ///
    /// Rejections need notes; modifications need a final value that is either
    /// non-empty or an explicit `Clear`. A final value passed with any other
    /// action is dropped.
    pub fn new(
        action: ReviewAction,
        notes: Option<String>,
        final_value: Option<FieldValue>,
    ) -> Result<Self, DomainError> {
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if let Some(n) = &notes {
            if n.chars().count() > MAX_REVIEW_NOTES_LEN {
                return Err(DomainError::ContentTooLong {
                    field: "review_notes",
                    max: MAX_REVIEW_NOTES_LEN,
                });
            }
        }

        let final_value = match action {
            ReviewAction::Reject => {
                if notes.is_none() {
                    return Err(DomainError::MissingReviewNotes);
                }
                None
            }
            ReviewAction::Modify => match final_value {
                Some(value) if !value.is_blank() => Some(value),
                _ => return Err(DomainError::MissingFinalValue),
            },
            ReviewAction::Approve => None,
        };

        Ok(Self {
            action,
            notes,
            final_value,
        })
    }

    pub fn approve() -> Self {
        Self {
            action: ReviewAction::Approve,
            notes: None,
            final_value: None,
        }
    }

    pub fn reject(notes: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(ReviewAction::Reject, Some(notes.into()), None)
    }

    pub fn modify(final_value: FieldValue, notes: Option<String>) -> Result<Self, DomainError> {
        Self::new(ReviewAction::Modify, notes, Some(final_value))
    }

    /// Check the decision against the submission kind it is applied to
    pub fn check_applicable(&self, submission: &Submission) -> Result<(), DomainError> {
        let Some(final_value) = self.final_value.as_ref() else {
            return Ok(());
        };
        match &submission.payload {
            SubmissionPayload::Correction(change) => validate_value(&change.field, final_value),
            SubmissionPayload::Faq(_) => match final_value.as_text() {
                Some(answer) if answer.chars().count() > MAX_FAQ_ANSWER_LEN => {
                    Err(DomainError::ContentTooLong {
                        field: "answer",
                        max: MAX_FAQ_ANSWER_LEN,
                    })
                }
                Some(_) => Ok(()),
                None => Err(DomainError::ValidationError(
                    "a modified FAQ answer must be text".to_string(),
                )),
            },
            SubmissionPayload::Game(_) => Err(DomainError::ValidationError(
                "game submissions can only be approved or rejected".to_string(),
            )),
        }
    }
}

/// Write to canonical data that accompanies a commit
#[derive(Debug, Clone, PartialEq)]
pub enum CommitEffect {
    None,
    WriteGameFields {
        game_id: Snowflake,
        fields: Vec<(String, FieldValue)>,
    },
    CreateGame {
        game: Game,
    },
    PublishFaq {
        entry: FaqEntry,
    },
}

/// One atomic unit for the submission store
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionCommit {
    /// The submission with status and review fields applied
    pub submission: Submission,
    pub effect: CommitEffect,
    pub audit: AuditLogEntry,
}

impl DecisionCommit {
    /// Apply `decision` to a copy of `submission` and compute the commit.
    ///
    /// `audit_id` identifies the audit entry; `entity_id` is used when the
    /// decision creates a game or publishes an FAQ entry.
    pub fn prepare(
        submission: &Submission,
        reviewer: &Actor,
        decision: &Decision,
        decided_at: DateTime<Utc>,
        audit_id: Snowflake,
        entity_id: Snowflake,
    ) -> Result<Self, DomainError> {
        let mut decided = submission.clone();
        decided.apply_decision(reviewer, decision, decided_at)?;
        let status = decided.status;

        let (old_value, new_value, effect) = match &submission.payload {
            SubmissionPayload::Correction(change) => {
                let committed = decision
                    .final_value
                    .clone()
                    .unwrap_or_else(|| change.new_value.clone());
                let effect = match (status.counts_as_approved(), submission.target_id()) {
                    (true, Some(game_id)) => CommitEffect::WriteGameFields {
                        game_id,
                        fields: vec![(change.field.clone(), committed.clone())],
                    },
                    _ => CommitEffect::None,
                };
                (Some(change.old_value.clone()), Some(committed), effect)
            }
            SubmissionPayload::Game(proposal) => {
                let effect = if status.counts_as_approved() {
                    match submission.target_id() {
                        Some(game_id) => {
                            let mut fields: Vec<(String, FieldValue)> = proposal
                                .changes
                                .iter()
                                .map(|c| (c.field.clone(), c.new_value.clone()))
                                .collect();
                            fields.push((
                                super::game::TITLE_FIELD.to_string(),
                                FieldValue::Text(proposal.title.clone()),
                            ));
                            CommitEffect::WriteGameFields { game_id, fields }
                        }
                        None => {
                            let mut game = Game::new(entity_id, proposal.title.clone());
                            game.fields = proposal
                                .changes
                                .iter()
                                .filter(|c| !c.new_value.is_clear())
                                .map(|c| (c.field.clone(), c.new_value.clone()))
                                .collect::<BTreeMap<_, _>>();
                            game.created_at = decided_at;
                            game.updated_at = decided_at;
                            CommitEffect::CreateGame { game }
                        }
                    }
                } else {
                    CommitEffect::None
                };
                (None, Some(FieldValue::Text(proposal.title.clone())), effect)
            }
            SubmissionPayload::Faq(proposal) => {
                let answer = decision
                    .final_value
                    .as_ref()
                    .and_then(FieldValue::as_text)
                    .unwrap_or(&proposal.answer)
                    .to_string();
                let effect = if status.counts_as_approved() {
                    CommitEffect::PublishFaq {
                        entry: FaqEntry {
                            id: entity_id,
                            question: proposal.question.clone(),
                            answer: answer.clone(),
                            category: proposal.category.clone(),
                            source_submission_id: submission.id,
                            created_at: decided_at,
                        },
                    }
                } else {
                    CommitEffect::None
                };
                (None, Some(FieldValue::Text(answer)), effect)
            }
        };

        let same_person = submission.submitter_id == reviewer.id;
        let audit = AuditLogEntry {
            id: audit_id,
            submission_id: submission.id,
            target: submission.target.clone(),
            field: submission.payload.audit_field().to_string(),
            old_value,
            new_value,
            reviewer_id: reviewer.id,
            reviewer_name: reviewer.name.clone(),
            reviewer_role: reviewer.role,
            submitter_id: (!same_person).then_some(submission.submitter_id),
            submitter_name: (!same_person).then(|| submission.submitter_name.clone()),
            status,
            notes: decision.notes.clone(),
            created_at: decided_at,
        };

        Ok(Self {
            submission: decided,
            effect,
            audit,
        })
    }

    #[inline]
    pub fn status(&self) -> SubmissionStatus {
        self.submission.status
    }

    /// Game and field written by an accepted correction
    pub fn corrected_field(&self) -> Option<(Snowflake, &str)> {
        match (&self.submission.payload, &self.effect) {
            (
                SubmissionPayload::Correction(change),
                CommitEffect::WriteGameFields { game_id, .. },
            ) => Some((*game_id, change.field.as_str())),
            _ => None,
        }
    }

    /// The audit entry with `old_value` read from `game` as it stands when
    /// the commit is applied. Earlier commits may have changed the field
    /// since intake.
    pub fn audit_against(&self, game: &Game) -> AuditLogEntry {
        let mut audit = self.audit.clone();
        if let Some((game_id, field)) = self.corrected_field() {
            if game_id == game.id {
                audit.old_value = Some(game.field_value(field));
            }
        }
        audit
    }
}
