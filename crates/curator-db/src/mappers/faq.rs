//! FAQ entry entity <-> model mapper

use curator_core::entities::FaqEntry;
use curator_core::Snowflake;

use crate::models::FaqEntryModel;

impl From<FaqEntryModel> for FaqEntry {
    fn from(model: FaqEntryModel) -> Self {
        FaqEntry {
            id: Snowflake::new(model.id),
            question: model.question,
            answer: model.answer,
            category: model.category,
            source_submission_id: Snowflake::new(model.source_submission_id),
            created_at: model.created_at,
        }
    }
}
