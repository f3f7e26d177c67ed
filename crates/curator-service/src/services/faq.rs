//! FAQ service

use tracing::instrument;

use crate::dto::FaqEntryResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// FAQ service
pub struct FaqService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FaqService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Published entries, oldest first
    #[instrument(skip(self))]
    pub async fn list(&self, category: Option<&str>) -> ServiceResult<Vec<FaqEntryResponse>> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let entries = self.ctx.faq_repo().list(category).await?;
        Ok(entries.iter().map(FaqEntryResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;

    #[tokio::test]
    async fn test_empty_category_lists_everything() {
        let harness = Harness::new();
        let entries = FaqService::new(&harness.ctx).list(Some("  ")).await.unwrap();
        assert!(entries.is_empty());
    }
}
