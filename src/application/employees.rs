use std::sync::Arc;

use crate::core::MutationError;
use crate::domain::{Employee, EmployeeDirectory, EmployeePatch, NewEmployee};
use crate::interface::EmployeeRepository;

/// Mutation and query functions for employees.
///
/// Inputs arrive already validated (their types can only be built by the
/// schemas in [`crate::validation`]). Store failures are logged and
/// surfaced as [`MutationError`].
#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: NewEmployee) -> Result<Employee, MutationError> {
        let created = self.repository.create(input).await?;
        tracing::info!(employee_id = %created.id, "employee created");
        Ok(created)
    }

    /// The `id` argument wins over whatever id the patch carries.
    pub async fn update(
        &self,
        id: &str,
        mut patch: EmployeePatch,
    ) -> Result<Employee, MutationError> {
        patch.id = id.to_string();
        let updated = self.repository.update(patch).await?;
        tracing::info!(employee_id = %updated.id, "employee updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<Employee, MutationError> {
        let removed = self.repository.delete(id).await?;
        tracing::info!(employee_id = %removed.id, "employee deleted");
        Ok(removed)
    }

    pub async fn list(&self) -> Result<Vec<Employee>, MutationError> {
        Ok(self.repository.list().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Employee>, MutationError> {
        Ok(self.repository.get_by_id(id).await?)
    }

    pub async fn directory(&self) -> Result<EmployeeDirectory, MutationError> {
        Ok(EmployeeDirectory::from_employees(self.list().await?))
    }
}
