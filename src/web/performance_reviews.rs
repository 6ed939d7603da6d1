use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use crate::core::ValidationIssue;
use crate::domain::{CompletePerformanceReview, PerformanceReview, ReviewFilter, Submission};
use crate::state::AppState;
use crate::validation::{EntitySchema, PerformanceReviewSchema, parse_id, parse_json};
use crate::web::{IdQuery, Result, WebError, viewer_from_headers};

#[derive(Debug, Default, Deserialize)]
pub struct ReviewListQuery {
    pub submitted: Option<String>,
}

fn parse_submission(raw: Option<&str>) -> Result<Option<Submission>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some("pending") => Ok(Some(Submission::Pending)),
        Some("completed") => Ok(Some(Submission::Completed)),
        Some(other) => Err(WebError::Validation(vec![ValidationIssue::new(
            "invalid_enum_value",
            "submitted",
            format!("Invalid enum value. Expected 'pending' | 'completed', received '{other}'"),
        )])),
    }
}

/// Admins see every review, anyone else only the reviews they still owe.
pub async fn list_performance_reviews(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<CompletePerformanceReview>>> {
    let submission = parse_submission(query.submitted.as_deref())?;
    let filter = ReviewFilter::for_viewer(&viewer_from_headers(&headers)).with_submission(submission);
    Ok(Json(state.performance_reviews.list(&filter).await?))
}

pub async fn get_performance_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompletePerformanceReview>> {
    state
        .performance_reviews
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| WebError::NotFound(format!("No PerformanceReview found with id '{id}'")))
}

pub async fn create_performance_review(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<PerformanceReview>)> {
    let input = PerformanceReviewSchema::insert(&parse_json(&body)?)?;
    let created = state.performance_reviews.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_performance_review(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    body: Bytes,
) -> Result<Json<PerformanceReview>> {
    let id = parse_id(query.id.as_deref())?;
    let patch = PerformanceReviewSchema::update(&id, &parse_json(&body)?)?;
    Ok(Json(state.performance_reviews.update(&id, patch).await?))
}
