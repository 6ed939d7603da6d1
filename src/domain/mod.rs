//! Domain records shared by the store, the services and the reconciler.

pub mod directory;
pub mod employee;
pub mod performance_review;
pub mod viewer;

pub use directory::{EmployeeDirectory, UNKNOWN_EMPLOYEE_NAME};
pub use employee::{Employee, EmployeePatch, NewEmployee, ROLES, Role, to_full_name};
pub use performance_review::{
    CompletePerformanceReview, NewPerformanceReview, PerformanceReview, PerformanceReviewPatch,
    ReviewFilter, Submission, format_submitted_at,
};
pub use viewer::Viewer;

/// Overlay a tri-state nullable patch value: `None` keeps, `Some(None)` clears.
pub(crate) fn overlay_nullable<T: Clone>(target: &mut Option<T>, patch: &Option<Option<T>>) {
    if let Some(value) = patch {
        *target = value.clone();
    }
}

pub(crate) fn overlay<T: Clone>(target: &mut T, patch: &Option<T>) {
    if let Some(value) = patch {
        *target = value.clone();
    }
}
