use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};

use crate::domain::Employee;
use crate::state::AppState;
use crate::validation::{EmployeeSchema, EntitySchema, parse_id, parse_json};
use crate::web::{IdQuery, Result, WebError, viewer_from_headers};

/// Only admins may browse the directory; everyone else gets a 404.
pub async fn list_employees(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Employee>>> {
    if !viewer_from_headers(&headers).is_admin() {
        return Err(WebError::NotFound("Not found".to_string()));
    }
    Ok(Json(state.employees.list().await?))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>> {
    state
        .employees
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| WebError::NotFound(format!("No Employee found with id '{id}'")))
}

pub async fn create_employee(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Employee>)> {
    let input = EmployeeSchema::insert(&parse_json(&body)?)?;
    let created = state.employees.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    body: Bytes,
) -> Result<Json<Employee>> {
    let id = parse_id(query.id.as_deref())?;
    let patch = EmployeeSchema::update(&id, &parse_json(&body)?)?;
    Ok(Json(state.employees.update(&id, patch).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Employee>> {
    let id = parse_id(query.id.as_deref())?;
    Ok(Json(state.employees.delete(&id).await?))
}
