use crate::core::{Result, StoreError, new_entity_id};
use crate::domain::{
    CompletePerformanceReview, Employee, EmployeeDirectory, EmployeePatch, NewEmployee,
    NewPerformanceReview, PerformanceReview, PerformanceReviewPatch, ReviewFilter,
};
use crate::interface::{EmployeeRepository, PerformanceReviewRepository};
use crate::storage::persistence::{SnapshotManager, StoreSnapshot};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use tokio::sync::RwLock;

const EMPLOYEE: &str = "Employee";
const PERFORMANCE_REVIEW: &str = "PerformanceReview";

/// Rows kept in insertion order, which is also `createdAt` order.
#[derive(Default, Clone)]
struct Tables {
    employees: Vec<Employee>,
    performance_reviews: Vec<PerformanceReview>,
}

impl Tables {
    fn employee_index(&self, id: &str) -> Option<usize> {
        self.employees.iter().position(|employee| employee.id == id)
    }

    fn review_index(&self, id: &str) -> Option<usize> {
        self.performance_reviews
            .iter()
            .position(|review| review.id == id)
    }

    fn directory(&self) -> EmployeeDirectory {
        EmployeeDirectory::from_employees(self.employees.iter().cloned())
    }

    fn check_participants(&self, employee_id: &str, assignee_id: &str) -> Result<()> {
        for (field, id) in [("employeeId", employee_id), ("assigneeId", assignee_id)] {
            if self.employee_index(id).is_none() {
                return Err(StoreError::ForeignKey(format!(
                    "`{field}` references missing {EMPLOYEE} '{id}'"
                )));
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::new(self.employees.clone(), self.performance_reviews.clone())
    }
}

/// In-process entity store with restrict-on-delete referential integrity
/// and an optional snapshot file rewritten after every mutation.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    snapshot: Option<SnapshotManager>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            snapshot: None,
        }
    }

    /// Open a store mirrored to `path`, loading existing rows if the file exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager = SnapshotManager::new(path);
        let tables = match manager.load()? {
            Some(snapshot) => {
                tracing::info!(
                    path = %manager.path().display(),
                    employees = snapshot.employees.len(),
                    performance_reviews = snapshot.performance_reviews.len(),
                    "loaded store snapshot"
                );
                Tables {
                    employees: snapshot.employees,
                    performance_reviews: snapshot.performance_reviews,
                }
            }
            None => Tables::default(),
        };
        Ok(Self {
            tables: RwLock::new(tables),
            snapshot: Some(manager),
        })
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        match &self.snapshot {
            Some(manager) => manager.save(&tables.snapshot()),
            None => Ok(()),
        }
    }

    /// Run `change` against a copy of the tables and install the copy only
    /// once it has been persisted. A failed change or a failed snapshot
    /// write leaves the live tables untouched.
    async fn mutate<T>(&self, change: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tables = self.tables.write().await;
        let mut next = tables.clone();
        let output = change(&mut next)?;
        self.persist(&next)?;
        *tables = next;
        Ok(output)
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn create(&self, input: NewEmployee) -> Result<Employee> {
        self.mutate(|tables| {
            let created = Employee::from_new(new_entity_id(), &input, Utc::now());
            tables.employees.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn update(&self, patch: EmployeePatch) -> Result<Employee> {
        self.mutate(|tables| {
            let index = tables
                .employee_index(&patch.id)
                .ok_or_else(|| StoreError::not_found(EMPLOYEE, &patch.id))?;

            let employee = &mut tables.employees[index];
            patch.apply_to(employee);
            employee.updated_at = Utc::now();
            Ok(employee.clone())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<Employee> {
        self.mutate(|tables| {
            let index = tables
                .employee_index(id)
                .ok_or_else(|| StoreError::not_found(EMPLOYEE, id))?;

            let referenced = tables
                .performance_reviews
                .iter()
                .any(|review| review.employee_id == id || review.assignee_id == id);
            if referenced {
                return Err(StoreError::ForeignKey(format!(
                    "{EMPLOYEE} '{id}' is still referenced by a {PERFORMANCE_REVIEW}"
                )));
            }

            Ok(tables.employees.remove(index))
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Employee>> {
        Ok(self.tables.read().await.employees.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employee_index(id)
            .map(|index| tables.employees[index].clone()))
    }
}

#[async_trait]
impl PerformanceReviewRepository for InMemoryStore {
    async fn create(&self, input: NewPerformanceReview) -> Result<PerformanceReview> {
        self.mutate(|tables| {
            tables.check_participants(&input.employee_id, &input.assignee_id)?;

            let created = PerformanceReview::from_new(new_entity_id(), &input, Utc::now());
            tables.performance_reviews.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn update(&self, patch: PerformanceReviewPatch) -> Result<PerformanceReview> {
        self.mutate(|tables| {
            let index = tables
                .review_index(&patch.id)
                .ok_or_else(|| StoreError::not_found(PERFORMANCE_REVIEW, &patch.id))?;

            let mut candidate = tables.performance_reviews[index].clone();
            patch.apply_to(&mut candidate);
            tables.check_participants(&candidate.employee_id, &candidate.assignee_id)?;
            candidate.updated_at = Utc::now();

            tables.performance_reviews[index] = candidate.clone();
            Ok(candidate)
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<PerformanceReview> {
        self.mutate(|tables| {
            let index = tables
                .review_index(id)
                .ok_or_else(|| StoreError::not_found(PERFORMANCE_REVIEW, id))?;
            Ok(tables.performance_reviews.remove(index))
        })
        .await
    }

    async fn list(&self, filter: &ReviewFilter) -> Result<Vec<CompletePerformanceReview>> {
        let tables = self.tables.read().await;
        let directory = tables.directory();
        Ok(tables
            .performance_reviews
            .iter()
            .map(|review| CompletePerformanceReview::join(review.clone(), &directory))
            .filter(|item| filter.matches(item))
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<CompletePerformanceReview>> {
        let tables = self.tables.read().await;
        let Some(index) = tables.review_index(id) else {
            return Ok(None);
        };
        let directory = tables.directory();
        Ok(Some(CompletePerformanceReview::join(
            tables.performance_reviews[index].clone(),
            &directory,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Submission;
    use tempfile::TempDir;

    fn new_employee(first: &str, email: &str) -> NewEmployee {
        NewEmployee {
            last_name: Some("Doe".into()),
            first_name: first.into(),
            email: email.into(),
            role: None,
        }
    }

    fn new_review(employee_id: &str, assignee_id: &str) -> NewPerformanceReview {
        NewPerformanceReview {
            employee_id: employee_id.into(),
            assignee_id: assignee_id.into(),
            submitted_at: None,
            feedback: None,
        }
    }

    #[tokio::test]
    async fn test_review_requires_existing_participants() {
        let store = InMemoryStore::new();
        let john = EmployeeRepository::create(&store, new_employee("John", "j@example.com"))
            .await
            .unwrap();

        let err = PerformanceReviewRepository::create(&store, new_review(&john.id, "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));

        let own = PerformanceReviewRepository::create(&store, new_review(&john.id, &john.id))
            .await
            .unwrap();
        assert_eq!(own.employee_id, own.assignee_id);
    }

    #[tokio::test]
    async fn test_referenced_employee_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let john = EmployeeRepository::create(&store, new_employee("John", "j@example.com"))
            .await
            .unwrap();
        let jane = EmployeeRepository::create(&store, new_employee("Jane", "jane@example.com"))
            .await
            .unwrap();
        let review = PerformanceReviewRepository::create(&store, new_review(&john.id, &jane.id))
            .await
            .unwrap();

        let err = EmployeeRepository::delete(&store, &jane.id).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));

        PerformanceReviewRepository::delete(&store, &review.id)
            .await
            .unwrap();
        let removed = EmployeeRepository::delete(&store, &jane.id).await.unwrap();
        assert_eq!(removed.first_name, "Jane");
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let store = InMemoryStore::new();
        let err = EmployeeRepository::update(&store, EmployeePatch::new("nobody"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::not_found(EMPLOYEE, "nobody"));
    }

    #[tokio::test]
    async fn test_list_joins_and_filters_reviews() {
        let store = InMemoryStore::new();
        let john = EmployeeRepository::create(&store, new_employee("John", "j@example.com"))
            .await
            .unwrap();
        let jane = EmployeeRepository::create(&store, new_employee("Jane", "jane@example.com"))
            .await
            .unwrap();
        let first = PerformanceReviewRepository::create(&store, new_review(&john.id, &jane.id))
            .await
            .unwrap();
        PerformanceReviewRepository::create(&store, new_review(&jane.id, &john.id))
            .await
            .unwrap();

        let mut submit = PerformanceReviewPatch::new(first.id.clone());
        submit.submitted_at = Some(Some(Utc::now()));
        PerformanceReviewRepository::update(&store, submit).await.unwrap();

        let all = PerformanceReviewRepository::list(&store, &ReviewFilter::all())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].employee.first_name, "John");
        assert_eq!(all[0].assignee.first_name, "Jane");

        let pending = ReviewFilter::all().with_submission(Some(Submission::Pending));
        let open = PerformanceReviewRepository::list(&store, &pending)
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].review.employee_id, jane.id);
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("syrups.snapshot");

        let store = InMemoryStore::open(&path).unwrap();
        let john = EmployeeRepository::create(&store, new_employee("John", "j@example.com"))
            .await
            .unwrap();
        drop(store);

        let reopened = InMemoryStore::open(&path).unwrap();
        let loaded = EmployeeRepository::get_by_id(&reopened, &john.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, john);
    }

    #[tokio::test]
    async fn test_failed_snapshot_write_leaves_tables_unchanged() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-directory");
        std::fs::write(&blocker, b"occupied").unwrap();

        let store = InMemoryStore::open(blocker.join("syrups.snapshot")).unwrap();
        let err = EmployeeRepository::create(&store, new_employee("Ann", "ann@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::IoError(_)));

        let rows = EmployeeRepository::list(&store).await.unwrap();
        assert!(rows.is_empty());
    }
}
