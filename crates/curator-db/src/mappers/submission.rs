//! Submission entity <-> model mapper

use curator_core::entities::{ReviewRecord, Submission, SubmissionKind, TargetRef};
use curator_core::{DomainError, Snowflake};
use serde_json::Value as JsonValue;

use super::{from_json, parse_column, to_json};
use crate::models::SubmissionModel;

impl TryFrom<SubmissionModel> for Submission {
    type Error = DomainError;

    fn try_from(model: SubmissionModel) -> Result<Self, Self::Error> {
        let id = Snowflake::new(model.id);
        let kind: SubmissionKind = parse_column(&model.kind, "submissions.kind")?;
        let payload: curator_core::SubmissionPayload =
            from_json(model.payload, "submissions.payload")?;
        if payload.kind() != kind {
            return Err(DomainError::DatabaseError(format!(
                "submission {id} payload does not match kind {kind}"
            )));
        }

        let target = match (model.target_game_id, model.target_slug) {
            (Some(game_id), Some(slug)) => Some(TargetRef {
                game_id: Snowflake::new(game_id),
                slug,
            }),
            _ => None,
        };

        let review = match (model.reviewer_id, model.reviewer_name, model.decided_at) {
            (Some(reviewer_id), Some(reviewer_name), Some(decided_at)) => Some(ReviewRecord {
                reviewer_id: Snowflake::new(reviewer_id),
                reviewer_name,
                decided_at,
                notes: model.review_notes,
                final_value: model
                    .final_value
                    .map(|v| from_json(v, "submissions.final_value"))
                    .transpose()?,
            }),
            _ => None,
        };

        Ok(Submission {
            id,
            target,
            submitter_id: Snowflake::new(model.submitter_id),
            submitter_name: model.submitter_name,
            submitted_at: model.submitted_at,
            payload,
            justification: model.justification,
            status: parse_column(&model.status, "submissions.status")?,
            review,
        })
    }
}

/// Column values for inserting a new submission
pub struct SubmissionInsert<'a> {
    pub id: i64,
    pub kind: &'static str,
    pub target_game_id: Option<i64>,
    pub target_slug: Option<&'a str>,
    pub submitter_id: i64,
    pub submitter_name: &'a str,
    pub payload: JsonValue,
    pub justification: Option<&'a str>,
}

impl<'a> SubmissionInsert<'a> {
    pub fn new(submission: &'a Submission) -> Result<Self, DomainError> {
        Ok(Self {
            id: submission.id.into_inner(),
            kind: submission.kind().as_str(),
            target_game_id: submission.target.as_ref().map(|t| t.game_id.into_inner()),
            target_slug: submission.target.as_ref().map(|t| t.slug.as_str()),
            submitter_id: submission.submitter_id.into_inner(),
            submitter_name: &submission.submitter_name,
            payload: to_json(&submission.payload)?,
            justification: submission.justification.as_deref(),
        })
    }
}

/// Column values written by the decision compare-and-set
pub struct ReviewUpdate<'a> {
    pub id: i64,
    pub status: &'static str,
    pub reviewer_id: i64,
    pub reviewer_name: &'a str,
    pub decided_at: chrono::DateTime<chrono::Utc>,
    pub review_notes: Option<&'a str>,
    pub final_value: Option<JsonValue>,
}

impl<'a> ReviewUpdate<'a> {
    /// Fails if the submission carries no review record
    pub fn new(decided: &'a Submission) -> Result<Self, DomainError> {
        let review = decided.review.as_ref().ok_or_else(|| {
            DomainError::InternalError(format!("submission {} has no review record", decided.id))
        })?;

        Ok(Self {
            id: decided.id.into_inner(),
            status: decided.status.as_str(),
            reviewer_id: review.reviewer_id.into_inner(),
            reviewer_name: &review.reviewer_name,
            decided_at: review.decided_at,
            review_notes: review.notes.as_deref(),
            final_value: review.final_value.as_ref().map(to_json).transpose()?,
        })
    }
}
