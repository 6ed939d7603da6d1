use std::sync::Arc;

use crate::core::MutationError;
use crate::domain::{
    CompletePerformanceReview, NewPerformanceReview, PerformanceReview, PerformanceReviewPatch,
    ReviewFilter,
};
use crate::interface::PerformanceReviewRepository;

/// Mutation and query functions for performance reviews.
#[derive(Clone)]
pub struct PerformanceReviewService {
    repository: Arc<dyn PerformanceReviewRepository>,
}

impl PerformanceReviewService {
    pub fn new(repository: Arc<dyn PerformanceReviewRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        input: NewPerformanceReview,
    ) -> Result<PerformanceReview, MutationError> {
        let created = self.repository.create(input).await?;
        tracing::info!(performance_review_id = %created.id, "performance review created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &str,
        mut patch: PerformanceReviewPatch,
    ) -> Result<PerformanceReview, MutationError> {
        patch.id = id.to_string();
        let updated = self.repository.update(patch).await?;
        tracing::info!(
            performance_review_id = %updated.id,
            submitted = updated.is_completed(),
            "performance review updated"
        );
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<PerformanceReview, MutationError> {
        let removed = self.repository.delete(id).await?;
        tracing::info!(performance_review_id = %removed.id, "performance review deleted");
        Ok(removed)
    }

    pub async fn list(
        &self,
        filter: &ReviewFilter,
    ) -> Result<Vec<CompletePerformanceReview>, MutationError> {
        Ok(self.repository.list(filter).await?)
    }

    pub async fn get_by_id(
        &self,
        id: &str,
    ) -> Result<Option<CompletePerformanceReview>, MutationError> {
        Ok(self.repository.get_by_id(id).await?)
    }
}
