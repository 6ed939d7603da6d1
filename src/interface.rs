use async_trait::async_trait;

use crate::core::Result;
use crate::domain::{
    CompletePerformanceReview, Employee, EmployeePatch, NewEmployee, NewPerformanceReview,
    PerformanceReview, PerformanceReviewPatch, ReviewFilter,
};

/// Create/read/update/delete contract for employees.
///
/// Services depend on this trait only, so the in-process store can be
/// swapped for a relational backend without touching callers.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, input: NewEmployee) -> Result<Employee>;

    /// Overlay the patch onto the row named by `patch.id`.
    async fn update(&self, patch: EmployeePatch) -> Result<Employee>;

    /// Remove a row, returning what was removed.
    async fn delete(&self, id: &str) -> Result<Employee>;

    async fn list(&self) -> Result<Vec<Employee>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Employee>>;
}

/// Same contract for performance reviews. Reads return rows joined with
/// their employee and assignee.
#[async_trait]
pub trait PerformanceReviewRepository: Send + Sync {
    async fn create(&self, input: NewPerformanceReview) -> Result<PerformanceReview>;

    async fn update(&self, patch: PerformanceReviewPatch) -> Result<PerformanceReview>;

    async fn delete(&self, id: &str) -> Result<PerformanceReview>;

    async fn list(&self, filter: &ReviewFilter) -> Result<Vec<CompletePerformanceReview>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<CompletePerformanceReview>>;
}
