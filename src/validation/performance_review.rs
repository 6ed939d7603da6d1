use serde_json::Value;

use crate::domain::{NewPerformanceReview, PerformanceReviewPatch};
use crate::validation::{EntitySchema, ObjectReader, Validated};

pub struct PerformanceReviewSchema;

impl EntitySchema for PerformanceReviewSchema {
    type Insert = NewPerformanceReview;
    type Update = PerformanceReviewPatch;

    fn insert(value: &Value) -> Validated<NewPerformanceReview> {
        insert_performance_review_params(value)
    }

    fn update(id: &str, value: &Value) -> Validated<PerformanceReviewPatch> {
        update_performance_review_params(id, value)
    }
}

pub fn insert_performance_review_params(value: &Value) -> Validated<NewPerformanceReview> {
    let mut reader = ObjectReader::new(value)?;
    let employee_id = reader.coerced_string("employeeId");
    let assignee_id = reader.coerced_string("assigneeId");
    let submitted_at = reader.nullable_date("submittedAt").flatten();
    let feedback = reader.nullable_string("feedback").flatten();

    reader.finish(|| {
        Some(NewPerformanceReview {
            employee_id: employee_id?,
            assignee_id: assignee_id?,
            submitted_at,
            feedback,
        })
    })
}

/// Both participants are always resubmitted; submission state and feedback
/// are tri-state so a form can clear them explicitly.
pub fn update_performance_review_params(
    id: &str,
    value: &Value,
) -> Validated<PerformanceReviewPatch> {
    let mut reader = ObjectReader::new(value)?;
    let employee_id = reader.coerced_string("employeeId");
    let assignee_id = reader.coerced_string("assigneeId");
    let submitted_at = reader.nullable_date("submittedAt");
    let feedback = reader.nullable_string("feedback");

    reader.finish(|| {
        Some(PerformanceReviewPatch {
            id: id.to_string(),
            employee_id: Some(employee_id?),
            assignee_id: Some(assignee_id?),
            submitted_at,
            feedback,
        })
    })
}
