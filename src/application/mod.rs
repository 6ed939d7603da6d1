pub mod actions;
pub mod employees;
pub mod list_view;
pub mod performance_reviews;

pub use actions::describe_error;
pub use employees::EmployeeService;
pub use list_view::{EmployeeListSource, ListSource, ListView, ReviewListSource, SubmitOutcome};
pub use performance_reviews::PerformanceReviewService;
