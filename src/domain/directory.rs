use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::Employee;

/// First name given to employees the directory cannot resolve.
pub const UNKNOWN_EMPLOYEE_NAME: &str = "Unknown";

/// Id → employee lookup used to join reviews with the people they reference.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    by_id: HashMap<String, Employee>,
}

impl EmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        Self {
            by_id: employees
                .into_iter()
                .map(|employee| (employee.id.clone(), employee))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Employee> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Never fails: a missing id yields a placeholder carrying that id.
    pub fn resolve(&self, id: &str) -> Employee {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| Self::placeholder(id))
    }

    pub fn placeholder(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            last_name: None,
            first_name: UNKNOWN_EMPLOYEE_NAME.to_string(),
            email: String::new(),
            role: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_resolve_to_placeholder() {
        let directory = EmployeeDirectory::new();
        let resolved = directory.resolve("ghost");
        assert_eq!(resolved.id, "ghost");
        assert_eq!(resolved.first_name, UNKNOWN_EMPLOYEE_NAME);
        assert!(resolved.last_name.is_none());
        assert!(!directory.contains("ghost"));
    }
}
