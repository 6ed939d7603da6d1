use std::sync::Arc;

use crate::application::{EmployeeService, PerformanceReviewService};
use crate::storage::InMemoryStore;

/// Shared handler state: one service per entity kind.
#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub performance_reviews: PerformanceReviewService,
}

impl AppState {
    pub fn new(employees: EmployeeService, performance_reviews: PerformanceReviewService) -> Self {
        Self {
            employees,
            performance_reviews,
        }
    }

    /// Both services backed by the same store.
    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        Self::new(
            EmployeeService::new(store.clone()),
            PerformanceReviewService::new(store),
        )
    }
}
