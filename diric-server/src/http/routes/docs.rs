//! API documentation
//!
//! The OpenAPI document is assembled from the `#[utoipa::path]`
//! annotations on the employee handlers. Swagger UI is served from the
//! process under `/docs/`; the document itself under [`OPENAPI_PATH`].

use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::employees;
use crate::http::server::AppState;
use crate::models::{Employee, NewEmployee, PositionChange};

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Diric API",
        description = "Methods to deal with employee's list",
        version = "1.0.0"
    ),
    paths(
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_position,
        employees::delete_employee,
    ),
    components(schemas(Employee, NewEmployee, PositionChange)),
    tags((name = "Employees", description = "Hire, inspect, move and discharge employees"))
)]
pub struct ApiDoc;

/// The OpenAPI document for the employee endpoints
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Documentation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, openapi()))
}
