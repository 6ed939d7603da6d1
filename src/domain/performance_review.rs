use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::domain::{Employee, EmployeeDirectory, Viewer, overlay, overlay_nullable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReview {
    pub id: EntityId,
    /// Subject of the review.
    pub employee_id: EntityId,
    /// Author of the review.
    pub assignee_id: EntityId,
    pub submitted_at: Option<DateTime<Utc>>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PerformanceReview {
    pub fn is_completed(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub(crate) fn from_new(id: EntityId, input: &NewPerformanceReview, now: DateTime<Utc>) -> Self {
        Self {
            id,
            employee_id: input.employee_id.clone(),
            assignee_id: input.assignee_id.clone(),
            submitted_at: input.submitted_at,
            feedback: input.feedback.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A review joined with the employees it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletePerformanceReview {
    #[serde(flatten)]
    pub review: PerformanceReview,
    pub employee: Employee,
    pub assignee: Employee,
}

impl CompletePerformanceReview {
    pub fn join(review: PerformanceReview, directory: &EmployeeDirectory) -> Self {
        let employee = directory.resolve(&review.employee_id);
        let assignee = directory.resolve(&review.assignee_id);
        Self {
            review,
            employee,
            assignee,
        }
    }

    pub fn id(&self) -> &str {
        &self.review.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerformanceReview {
    pub employee_id: EntityId,
    pub assignee_id: EntityId,
    pub submitted_at: Option<DateTime<Utc>>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReviewPatch {
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Option<String>>,
}

impl PerformanceReviewPatch {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, review: &mut PerformanceReview) {
        overlay(&mut review.employee_id, &self.employee_id);
        overlay(&mut review.assignee_id, &self.assignee_id);
        overlay_nullable(&mut review.submitted_at, &self.submitted_at);
        overlay_nullable(&mut review.feedback, &self.feedback);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Submission {
    /// `submittedAt` is null.
    Pending,
    /// `submittedAt` is set.
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub submission: Option<Submission>,
    pub employee_id: Option<EntityId>,
    pub assignee_id: Option<EntityId>,
    pub assignee_email: Option<String>,
}

impl ReviewFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Reviews the viewer still has to write.
    pub fn by_requiring_completion(viewer: &Viewer) -> Self {
        Self {
            submission: Some(Submission::Pending),
            assignee_email: Some(viewer.email.clone().unwrap_or_default()),
            ..Self::default()
        }
    }

    /// Admins see everything; everyone else only their outstanding reviews.
    pub fn for_viewer(viewer: &Viewer) -> Self {
        if viewer.is_admin() {
            Self::all()
        } else {
            Self::by_requiring_completion(viewer)
        }
    }

    pub fn with_submission(mut self, submission: Option<Submission>) -> Self {
        if submission.is_some() {
            self.submission = submission;
        }
        self
    }

    pub fn matches(&self, item: &CompletePerformanceReview) -> bool {
        let review = &item.review;
        if let Some(submission) = self.submission {
            let completed = review.is_completed();
            if completed != (submission == Submission::Completed) {
                return false;
            }
        }
        if let Some(employee_id) = &self.employee_id
            && &review.employee_id != employee_id
        {
            return false;
        }
        if let Some(assignee_id) = &self.assignee_id
            && &review.assignee_id != assignee_id
        {
            return false;
        }
        if let Some(email) = &self.assignee_email
            && !item.assignee.email.eq_ignore_ascii_case(email)
        {
            return false;
        }
        true
    }
}

/// Short "M/D/YY, H:MM AM" rendering, or "N/A" for unsubmitted reviews.
pub fn format_submitted_at(submitted_at: Option<DateTime<Utc>>) -> String {
    match submitted_at {
        Some(ts) => ts.format("%-m/%-d/%y, %-I:%M %p").to_string(),
        None => "N/A".to_string(),
    }
}
