use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use syrups::reconciler::ActionFor;
use syrups::validation::EmployeeSchema;
use syrups::{
    AppState, Employee, EmployeeDirectory, EmployeeListSource, EmployeePatch, EntryStatus,
    InMemoryStore, ListSource, ListView, MutationError, NewEmployee, NewPerformanceReview,
    OptimisticAction, ReviewListSource, Role, SubmitOutcome, Viewer,
};
use tokio::sync::Semaphore;

fn state() -> AppState {
    AppState::with_store(Arc::new(InMemoryStore::new()))
}

async fn seed_employee(state: &AppState, first: &str, email: &str) -> Employee {
    state
        .employees
        .create(NewEmployee {
            last_name: None,
            first_name: first.into(),
            email: email.into(),
            role: Some(Role::Employee),
        })
        .await
        .expect("seed employee")
}

/// Holds every commit until the test hands out a permit.
struct GatedSource {
    inner: EmployeeListSource,
    gate: Arc<Semaphore>,
}

#[async_trait]
impl ListSource for GatedSource {
    type Record = Employee;
    type Schema = EmployeeSchema;

    async fn fetch(&self) -> Result<(Vec<Employee>, EmployeeDirectory), MutationError> {
        self.inner.fetch().await
    }

    async fn commit(&self, action: &ActionFor<Employee>) -> Result<(), MutationError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| MutationError::new("gate closed"))?;
        self.inner.commit(action).await
    }
}

#[tokio::test]
async fn test_create_form_is_saved_and_refetched() {
    let state = state();
    seed_employee(&state, "Ann", "ann@example.com").await;
    let view = ListView::load(EmployeeListSource::new(state.employees.clone()))
        .await
        .unwrap();

    let outcome = view
        .submit_form(&json!({
            "action": "create",
            "data": { "firstName": "Bo", "email": "bo@example.com" }
        }))
        .await;

    assert_eq!(outcome, SubmitOutcome::Saved);
    let entries = view.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.status == EntryStatus::Persisted));
    assert_eq!(entries[1].record.first_name, "Bo");
    assert!(!entries[1].record.id.is_empty());
}

#[tokio::test]
async fn test_invalid_form_leaves_list_untouched() {
    let state = state();
    seed_employee(&state, "Ann", "ann@example.com").await;
    let view = ListView::load(EmployeeListSource::new(state.employees.clone()))
        .await
        .unwrap();
    let before = view.entries();

    let outcome = view
        .submit_form(&json!({ "action": "create", "data": { "email": "nope" } }))
        .await;

    match outcome {
        SubmitOutcome::Invalid(issues) => assert!(!issues.is_empty()),
        other => panic!("expected Invalid, got {other:?}"),
    }
    assert_eq!(view.entries(), before);
}

#[tokio::test]
async fn test_unsupported_kind_is_ignored() {
    let state = state();
    let view = ListView::load(EmployeeListSource::new(state.employees.clone()))
        .await
        .unwrap();

    let outcome = view
        .submit_form(&json!({ "action": "archive", "data": { "id": "e1" } }))
        .await;
    assert_eq!(outcome, SubmitOutcome::Ignored);
    assert!(view.entries().is_empty());
}

#[tokio::test]
async fn test_failed_commit_reopens_form_and_restores_list() {
    let state = state();
    let ann = seed_employee(&state, "Ann", "ann@example.com").await;
    let bo = seed_employee(&state, "Bo", "bo@example.com").await;
    state
        .performance_reviews
        .create(NewPerformanceReview {
            employee_id: ann.id.clone(),
            assignee_id: bo.id.clone(),
            submitted_at: None,
            feedback: None,
        })
        .await
        .unwrap();

    let view = ListView::load(EmployeeListSource::new(state.employees.clone()))
        .await
        .unwrap();
    let delete: ActionFor<Employee> = OptimisticAction::Delete(ann.id.clone());

    match view.submit(delete.clone()).await {
        SubmitOutcome::Failed { message, reopen } => {
            assert!(message.starts_with("Foreign key constraint failed"));
            assert_eq!(reopen, delete);
        }
        other => panic!("expected Failed, got {other:?}"),
    }

    let entries = view.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].status, EntryStatus::Persisted);
    assert_eq!(entries[0].record.id, ann.id);
    assert_eq!(view.pending(), 0);
}

#[tokio::test]
async fn test_overlapping_mutation_on_same_row_is_busy() {
    let state = state();
    let ann = seed_employee(&state, "Ann", "ann@example.com").await;
    let gate = Arc::new(Semaphore::new(0));
    let view = ListView::load(GatedSource {
        inner: EmployeeListSource::new(state.employees.clone()),
        gate: gate.clone(),
    })
    .await
    .unwrap();

    let rename = |first: &str| {
        let mut patch = EmployeePatch::new(ann.id.clone());
        patch.first_name = Some(first.to_string());
        patch.email = Some(ann.email.clone());
        OptimisticAction::Update(patch)
    };

    let (first, second, shown) = tokio::join!(
        view.submit(rename("Annie")),
        view.submit(rename("Anna")),
        async {
            let shown = view.entries()[0].record.first_name.clone();
            gate.add_permits(1);
            shown
        },
    );

    assert_eq!(shown, "Annie");
    assert_eq!(first, SubmitOutcome::Saved);
    assert_eq!(second, SubmitOutcome::Busy(ann.id.clone()));

    let stored = state.employees.get_by_id(&ann.id).await.unwrap().unwrap();
    assert_eq!(stored.first_name, "Annie");
    assert_eq!(view.entries()[0].record.first_name, "Annie");

    // Claim released once the first mutation settled.
    gate.add_permits(1);
    assert_eq!(view.submit(rename("Anna")).await, SubmitOutcome::Saved);
}

#[tokio::test]
async fn test_submitted_review_leaves_assignee_queue() {
    let state = state();
    let ann = seed_employee(&state, "Ann", "ann@example.com").await;
    let bo = seed_employee(&state, "Bo", "bo@example.com").await;
    let review = state
        .performance_reviews
        .create(NewPerformanceReview {
            employee_id: ann.id.clone(),
            assignee_id: bo.id.clone(),
            submitted_at: None,
            feedback: None,
        })
        .await
        .unwrap();

    let viewer = Viewer::new(Some("bo@example.com".into()), Some(Role::Employee));
    let view = ListView::load(ReviewListSource::new(
        state.performance_reviews.clone(),
        state.employees.clone(),
        viewer,
    ))
    .await
    .unwrap();
    assert_eq!(view.entries().len(), 1);
    assert_eq!(view.entries()[0].record.employee.first_name, "Ann");

    let outcome = view
        .submit_form(&json!({
            "action": "update",
            "data": {
                "id": review.id,
                "employeeId": ann.id,
                "assigneeId": bo.id,
                "submittedAt": "2024-03-09T09:30:00Z",
                "feedback": "Good work"
            }
        }))
        .await;

    assert_eq!(outcome, SubmitOutcome::Saved);
    assert!(view.entries().is_empty());
}
