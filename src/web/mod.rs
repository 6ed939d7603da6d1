//! HTTP surface over the mutation and query functions.
//!
//! Bodies are read as raw bytes and run through the schemas so malformed
//! JSON and field problems share one `{"error": [issues]}` shape.

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::{MutationError, ServiceError, ValidationIssue};
use crate::domain::{Role, Viewer};
use crate::state::AppState;

pub mod employees;
pub mod performance_reviews;

pub const VIEWER_EMAIL_HEADER: &str = "x-viewer-email";
pub const VIEWER_ROLE_HEADER: &str = "x-viewer-role";

#[derive(Debug)]
pub enum WebError {
    Validation(Vec<ValidationIssue>),
    NotFound(String),
    Mutation(MutationError),
}

impl From<Vec<ValidationIssue>> for WebError {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        WebError::Validation(issues)
    }
}

impl From<MutationError> for WebError {
    fn from(err: MutationError) -> Self {
        WebError::Mutation(err)
    }
}

impl From<ServiceError> for WebError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(issues) => WebError::Validation(issues),
            ServiceError::Mutation(err) => WebError::Mutation(err),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Validation(issues) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": issues }))).into_response()
            }
            WebError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            WebError::Mutation(err) => (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WebError>;

/// `?id=` on PUT and DELETE routes.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Identity set by the upstream proxy. Missing or unknown values make an
/// anonymous, non-admin viewer.
pub fn viewer_from_headers(headers: &HeaderMap) -> Viewer {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    Viewer::new(
        read(VIEWER_EMAIL_HEADER).map(str::to_string),
        read(VIEWER_ROLE_HEADER).and_then(Role::parse),
    )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route(
            "/api/employees",
            get(employees::list_employees)
                .post(employees::create_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/api/employees/:id", get(employees::get_employee))
        .route(
            "/api/performanceReviews",
            get(performance_reviews::list_performance_reviews)
                .post(performance_reviews::create_performance_review)
                .put(performance_reviews::update_performance_review),
        )
        .route(
            "/api/performanceReviews/:id",
            get(performance_reviews::get_performance_review),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ]),
        )
        .with_state(state)
}
