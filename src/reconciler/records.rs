use crate::domain::{
    CompletePerformanceReview, Employee, EmployeeDirectory, EmployeePatch, NewEmployee,
    NewPerformanceReview, PerformanceReview, PerformanceReviewPatch,
};
use crate::reconciler::{OptimisticRecord, ReconcileContext};

impl OptimisticRecord for Employee {
    type Draft = NewEmployee;
    type Patch = EmployeePatch;

    fn record_id(&self) -> &str {
        &self.id
    }

    fn patch_target(patch: &EmployeePatch) -> &str {
        &patch.id
    }

    fn synthesize(draft: &NewEmployee, ctx: &ReconcileContext<'_>) -> Self {
        // No real id until the store confirms the insert.
        Employee::from_new(String::new(), draft, ctx.now)
    }

    fn overlay(&self, patch: &EmployeePatch, _ctx: &ReconcileContext<'_>) -> Self {
        let mut next = self.clone();
        patch.apply_to(&mut next);
        next
    }
}

impl OptimisticRecord for CompletePerformanceReview {
    type Draft = NewPerformanceReview;
    type Patch = PerformanceReviewPatch;

    fn record_id(&self) -> &str {
        &self.review.id
    }

    fn patch_target(patch: &PerformanceReviewPatch) -> &str {
        &patch.id
    }

    fn synthesize(draft: &NewPerformanceReview, ctx: &ReconcileContext<'_>) -> Self {
        let review = PerformanceReview::from_new(String::new(), draft, ctx.now);
        Self::join(review, ctx.directory)
    }

    fn overlay(&self, patch: &PerformanceReviewPatch, ctx: &ReconcileContext<'_>) -> Self {
        let mut review = self.review.clone();
        patch.apply_to(&mut review);

        let employee = match patch.employee_id {
            Some(_) => resolve_or_keep(ctx.directory, &review.employee_id, &self.employee),
            None => self.employee.clone(),
        };
        let assignee = match patch.assignee_id {
            Some(_) => resolve_or_keep(ctx.directory, &review.assignee_id, &self.assignee),
            None => self.assignee.clone(),
        };

        Self {
            review,
            employee,
            assignee,
        }
    }
}

/// Prefer the directory; fall back to the already-joined record when it is
/// the same person, and to a placeholder otherwise.
fn resolve_or_keep(directory: &EmployeeDirectory, id: &str, current: &Employee) -> Employee {
    match directory.get(id) {
        Some(found) => found.clone(),
        None if current.id == id => current.clone(),
        None => EmployeeDirectory::placeholder(id),
    }
}
