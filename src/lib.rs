// ============================================================================
// Syrups Library
// ============================================================================

pub mod application;
pub mod config;
pub mod core;
pub mod domain;
pub mod interface;
pub mod reconciler;
pub mod state;
pub mod storage;
pub mod validation;
pub mod web;

// Re-export main types for convenience
pub use application::{
    EmployeeListSource, EmployeeService, ListSource, ListView, PerformanceReviewService,
    ReviewListSource, SubmitOutcome, describe_error,
};
pub use crate::core::{EntityId, MutationError, Result, ServiceError, StoreError, ValidationIssue};
pub use domain::{
    CompletePerformanceReview, Employee, EmployeeDirectory, EmployeePatch, NewEmployee,
    NewPerformanceReview, PerformanceReview, PerformanceReviewPatch, ReviewFilter, Role, Viewer,
};
pub use reconciler::{
    EntryStatus, ListEntry, OptimisticAction, OptimisticList, OptimisticRecord, ReconcileContext,
    reconcile,
};
pub use state::AppState;
pub use storage::InMemoryStore;
pub use web::build_router;
