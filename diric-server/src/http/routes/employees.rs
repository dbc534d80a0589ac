//! Employee endpoints
//!
//! Each handler validates its input first and returns early on failure;
//! only valid requests reach the database. The `#[utoipa::path]`
//! annotations feed the document served under `/docs`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::{EmployeePath, JsonBody};
use crate::http::server::AppState;
use crate::models::{Employee, NewEmployee, PositionChange};

pub const HIRED: &str = "This employee was successfully hired";
pub const POSITION_CHANGED: &str = "This employee changed his position";
pub const DISCHARGED: &str = "This employee was discharged";

/// Returns all employees
#[utoipa::path(
    get,
    path = "/employees",
    tag = "Employees",
    responses(
        (status = 200, description = "An array of employees", body = [Employee]),
        (status = 500, description = "No data, or internal server error", body = String, content_type = "text/plain")
    )
)]
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = state
        .repo()
        .list()
        .await
        .map_err(|e| state.database_failure(e))?
        .ok_or(ApiError::NoData)?;

    Ok(Json(employees))
}

/// Returns a single employee
#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "Employees",
    params(("id" = i64, Path, description = "Employee's id")),
    responses(
        (status = 200, description = "Employee", body = Employee),
        (status = 404, description = "Employee not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Your id is invalid, or internal server error", body = String, content_type = "text/plain")
    )
)]
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    EmployeePath(id): EmployeePath,
) -> Result<Json<Employee>, ApiError> {
    state
        .repo()
        .get(id)
        .await
        .map_err(|e| state.database_failure(e))?
        .map(Json)
        .ok_or_else(|| ApiError::employee_not_found(id))
}

/// Creates a new employee
#[utoipa::path(
    post,
    path = "/employees",
    tag = "Employees",
    request_body(content = NewEmployee, description = "Employee object"),
    responses(
        (status = 200, description = "Successfully created", body = String, content_type = "text/plain",
            headers(("location" = String, description = "Path of the new employee"))),
        (status = 400, description = "Body is not JSON", body = String, content_type = "text/plain"),
        (status = 500, description = "Data type invalid, or internal server error", body = String, content_type = "text/plain")
    )
)]
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let employee = NewEmployee::from_json(&body)?;
    let id = state
        .repo()
        .create(&employee)
        .await
        .map_err(|e| state.database_failure(e))?;

    tracing::info!(%id, "employee hired");
    Ok(([(header::LOCATION, format!("/employees/{}", id))], HIRED))
}

/// Updates a single employee's position
#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = "Employees",
    params(("id" = i64, Path, description = "Employee's id")),
    request_body(content = PositionChange, description = "Employee's position"),
    responses(
        (status = 200, description = "Successfully updated", body = String, content_type = "text/plain"),
        (status = 400, description = "Body is not JSON", body = String, content_type = "text/plain"),
        (status = 404, description = "Employee not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Invalid id or data type, or internal server error", body = String, content_type = "text/plain")
    )
)]
pub async fn update_position(
    State(state): State<Arc<AppState>>,
    EmployeePath(id): EmployeePath,
    JsonBody(body): JsonBody,
) -> Result<&'static str, ApiError> {
    let change = PositionChange::from_json(&body)?;
    let updated = state
        .repo()
        .update_position(id, &change.position)
        .await
        .map_err(|e| state.database_failure(e))?;

    if updated == 0 {
        return Err(ApiError::employee_not_found(id));
    }
    tracing::info!(%id, position = %change.position, "position changed");
    Ok(POSITION_CHANGED)
}

/// Deletes a single employee
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = "Employees",
    params(("id" = i64, Path, description = "Employee's id")),
    responses(
        (status = 200, description = "Successfully deleted", body = String, content_type = "text/plain"),
        (status = 404, description = "Employee not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Your id is invalid, or internal server error", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    EmployeePath(id): EmployeePath,
) -> Result<&'static str, ApiError> {
    let deleted = state
        .repo()
        .delete(id)
        .await
        .map_err(|e| state.database_failure(e))?;

    if deleted == 0 {
        return Err(ApiError::employee_not_found(id));
    }
    tracing::info!(%id, "employee discharged");
    Ok(DISCHARGED)
}

/// Employee routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_position).delete(delete_employee),
        )
}
