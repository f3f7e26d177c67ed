//! Audit log entity <-> model mapper

use curator_core::entities::{AuditLogEntry, TargetRef};
use curator_core::{DomainError, Snowflake};
use serde_json::Value as JsonValue;

use super::{from_json, parse_column, to_json};
use crate::models::AuditLogModel;

impl TryFrom<AuditLogModel> for AuditLogEntry {
    type Error = DomainError;

    fn try_from(model: AuditLogModel) -> Result<Self, Self::Error> {
        let target = match (model.target_game_id, model.target_slug) {
            (Some(game_id), Some(slug)) => Some(TargetRef {
                game_id: Snowflake::new(game_id),
                slug,
            }),
            _ => None,
        };

        Ok(AuditLogEntry {
            id: Snowflake::new(model.id),
            submission_id: Snowflake::new(model.submission_id),
            target,
            field: model.field,
            old_value: model
                .old_value
                .map(|v| from_json(v, "audit_log.old_value"))
                .transpose()?,
            new_value: model
                .new_value
                .map(|v| from_json(v, "audit_log.new_value"))
                .transpose()?,
            reviewer_id: Snowflake::new(model.reviewer_id),
            reviewer_name: model.reviewer_name,
            reviewer_role: parse_column(&model.reviewer_role, "audit_log.reviewer_role")?,
            submitter_id: model.submitter_id.map(Snowflake::new),
            submitter_name: model.submitter_name,
            status: parse_column(&model.status, "audit_log.status")?,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}

/// Column values for inserting an audit entry
pub struct AuditInsert<'a> {
    pub id: i64,
    pub submission_id: i64,
    pub target_game_id: Option<i64>,
    pub target_slug: Option<&'a str>,
    pub field: &'a str,
    pub old_value: Option<JsonValue>,
    pub new_value: Option<JsonValue>,
    pub reviewer_id: i64,
    pub reviewer_name: &'a str,
    pub reviewer_role: &'static str,
    pub submitter_id: Option<i64>,
    pub submitter_name: Option<&'a str>,
    pub status: &'static str,
    pub notes: Option<&'a str>,
}

impl<'a> AuditInsert<'a> {
    pub fn new(entry: &'a AuditLogEntry) -> Result<Self, DomainError> {
        Ok(Self {
            id: entry.id.into_inner(),
            submission_id: entry.submission_id.into_inner(),
            target_game_id: entry.target.as_ref().map(|t| t.game_id.into_inner()),
            target_slug: entry.target.as_ref().map(|t| t.slug.as_str()),
            field: &entry.field,
            old_value: entry.old_value.as_ref().map(to_json).transpose()?,
            new_value: entry.new_value.as_ref().map(to_json).transpose()?,
            reviewer_id: entry.reviewer_id.into_inner(),
            reviewer_name: &entry.reviewer_name,
            reviewer_role: entry.reviewer_role.as_str(),
            submitter_id: entry.submitter_id.map(Snowflake::into_inner),
            submitter_name: entry.submitter_name.as_deref(),
            status: entry.status.as_str(),
            notes: entry.notes.as_deref(),
        })
    }
}
