//! Driver behind the employee and performance review list views.
//!
//! A submission is shown immediately through the reconciler, committed to
//! the store, and then settled by refetching the authoritative list. While
//! a row has a mutation in flight, further updates or deletes of that row
//! are refused with [`SubmitOutcome::Busy`] so two edits can never race.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::application::{EmployeeService, PerformanceReviewService, describe_error};
use crate::core::{EntityId, MutationError, ServiceError, ValidationIssue};
use crate::domain::{CompletePerformanceReview, Employee, EmployeeDirectory, ReviewFilter, Viewer};
use crate::reconciler::{
    ActionFor, ListEntry, OptimisticAction, OptimisticList, OptimisticRecord, ReconcileContext,
};
use crate::validation::{EmployeeSchema, EntitySchema, PerformanceReviewSchema};

/// Where a list view reads its authoritative rows and sends its mutations.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Record: OptimisticRecord + Send + Sync;
    type Schema: EntitySchema<
            Insert = <Self::Record as OptimisticRecord>::Draft,
            Update = <Self::Record as OptimisticRecord>::Patch,
        >;

    /// Authoritative rows plus the directory used to resolve relationships.
    async fn fetch(&self) -> Result<(Vec<Self::Record>, EmployeeDirectory), MutationError>;

    async fn commit(&self, action: &ActionFor<Self::Record>) -> Result<(), MutationError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R: OptimisticRecord> {
    /// Committed; the list now mirrors the store.
    Saved,
    /// The form input did not validate. Nothing was dispatched.
    Invalid(Vec<ValidationIssue>),
    /// The targeted row already has a mutation in flight.
    Busy(EntityId),
    /// The store rejected the mutation. `reopen` carries the attempted
    /// action so the edit form can be shown again with those values.
    Failed {
        message: String,
        reopen: ActionFor<R>,
    },
    /// Unsupported action kind; the list is unchanged.
    Ignored,
}

pub struct ListView<S: ListSource> {
    source: S,
    list: RwLock<OptimisticList<S::Record>>,
    directory: RwLock<EmployeeDirectory>,
    in_flight: Mutex<HashSet<EntityId>>,
}

impl<S: ListSource> ListView<S> {
    pub async fn load(source: S) -> Result<Self, MutationError> {
        let (rows, directory) = source.fetch().await?;
        Ok(Self {
            source,
            list: RwLock::new(OptimisticList::new(rows)),
            directory: RwLock::new(directory),
            in_flight: Mutex::new(HashSet::new()),
        })
    }

    /// The list to render right now, pending rows included.
    pub fn entries(&self) -> Vec<ListEntry<S::Record>> {
        let list = self.list.read().unwrap_or_else(PoisonError::into_inner);
        list.entries().iter().cloned().collect()
    }

    pub fn pending(&self) -> usize {
        self.list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .pending()
    }

    /// Refetch and replace the reconciled list wholesale.
    pub async fn refresh(&self) -> Result<(), MutationError> {
        let (rows, directory) = self.source.fetch().await?;
        *self
            .directory
            .write()
            .unwrap_or_else(PoisonError::into_inner) = directory;
        self.list
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .reset(rows);
        Ok(())
    }

    /// Validate a raw `{ action, data }` form submission, then submit it.
    pub async fn submit_form(&self, raw: &Value) -> SubmitOutcome<S::Record> {
        match ActionFor::<S::Record>::parse::<S::Schema>(raw) {
            Ok(action) => self.submit(action).await,
            Err(issues) => {
                tracing::warn!(
                    issues = issues.len(),
                    "list submission rejected by validation"
                );
                SubmitOutcome::Invalid(issues)
            }
        }
    }

    pub async fn submit(&self, action: ActionFor<S::Record>) -> SubmitOutcome<S::Record> {
        if let OptimisticAction::Unsupported(kind) = &action {
            tracing::warn!(kind = %kind, "ignoring unsupported list action");
            return SubmitOutcome::Ignored;
        }

        let target = target_of::<S::Record>(&action);
        let Some(_claim) = InFlightClaim::acquire(&self.in_flight, target) else {
            let busy = target.unwrap_or_default().to_string();
            tracing::warn!(row = %busy, "row already has a mutation in flight");
            return SubmitOutcome::Busy(busy);
        };

        self.apply(&action);

        match self.source.commit(&action).await {
            Ok(()) => {
                if let Err(err) = self.refresh().await {
                    // The commit landed; keep the overlay until the next refresh.
                    tracing::warn!(error = %err, "refetch after commit failed");
                }
                SubmitOutcome::Saved
            }
            Err(err) => {
                if self.refresh().await.is_err() {
                    self.list
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .revert();
                }
                SubmitOutcome::Failed {
                    message: describe_error(&ServiceError::Mutation(err)),
                    reopen: action,
                }
            }
        }
    }

    fn apply(&self, action: &ActionFor<S::Record>) {
        let directory = self.directory.read().unwrap_or_else(PoisonError::into_inner);
        let ctx = ReconcileContext::new(&directory);
        self.list
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .dispatch(action, &ctx);
    }
}

fn target_of<R: OptimisticRecord>(action: &ActionFor<R>) -> Option<&str> {
    match action {
        OptimisticAction::Update(patch) => Some(R::patch_target(patch)),
        OptimisticAction::Delete(id) => Some(id),
        OptimisticAction::Create(_) | OptimisticAction::Unsupported(_) => None,
    }
}

/// Marks a row as busy until dropped. Creates have no row yet and always
/// succeed in claiming.
struct InFlightClaim<'a> {
    rows: &'a Mutex<HashSet<EntityId>>,
    row: Option<EntityId>,
}

impl<'a> InFlightClaim<'a> {
    fn acquire(rows: &'a Mutex<HashSet<EntityId>>, row: Option<&str>) -> Option<Self> {
        if let Some(row) = row {
            let mut busy = rows.lock().unwrap_or_else(PoisonError::into_inner);
            if !busy.insert(row.to_string()) {
                return None;
            }
        }
        Some(Self {
            rows,
            row: row.map(str::to_string),
        })
    }
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        if let Some(row) = self.row.take() {
            self.rows
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&row);
        }
    }
}

pub struct EmployeeListSource {
    employees: EmployeeService,
}

impl EmployeeListSource {
    pub fn new(employees: EmployeeService) -> Self {
        Self { employees }
    }
}

#[async_trait]
impl ListSource for EmployeeListSource {
    type Record = Employee;
    type Schema = EmployeeSchema;

    async fn fetch(&self) -> Result<(Vec<Employee>, EmployeeDirectory), MutationError> {
        let employees = self.employees.list().await?;
        let directory = EmployeeDirectory::from_employees(employees.iter().cloned());
        Ok((employees, directory))
    }

    async fn commit(&self, action: &ActionFor<Employee>) -> Result<(), MutationError> {
        match action {
            OptimisticAction::Create(draft) => {
                self.employees.create(draft.clone()).await?;
            }
            OptimisticAction::Update(patch) => {
                self.employees.update(&patch.id, patch.clone()).await?;
            }
            OptimisticAction::Delete(id) => {
                self.employees.delete(id).await?;
            }
            OptimisticAction::Unsupported(_) => {}
        }
        Ok(())
    }
}

/// Reviews visible to one viewer, joined through the current employee list.
pub struct ReviewListSource {
    reviews: PerformanceReviewService,
    employees: EmployeeService,
    viewer: Viewer,
}

impl ReviewListSource {
    pub fn new(
        reviews: PerformanceReviewService,
        employees: EmployeeService,
        viewer: Viewer,
    ) -> Self {
        Self {
            reviews,
            employees,
            viewer,
        }
    }
}

#[async_trait]
impl ListSource for ReviewListSource {
    type Record = CompletePerformanceReview;
    type Schema = PerformanceReviewSchema;

    async fn fetch(
        &self,
    ) -> Result<(Vec<CompletePerformanceReview>, EmployeeDirectory), MutationError> {
        let rows = self
            .reviews
            .list(&ReviewFilter::for_viewer(&self.viewer))
            .await?;
        let directory = self.employees.directory().await?;
        Ok((rows, directory))
    }

    async fn commit(&self, action: &ActionFor<CompletePerformanceReview>) -> Result<(), MutationError> {
        match action {
            OptimisticAction::Create(draft) => {
                self.reviews.create(draft.clone()).await?;
            }
            OptimisticAction::Update(patch) => {
                self.reviews.update(&patch.id, patch.clone()).await?;
            }
            OptimisticAction::Delete(id) => {
                self.reviews.delete(id).await?;
            }
            OptimisticAction::Unsupported(_) => {}
        }
        Ok(())
    }
}
