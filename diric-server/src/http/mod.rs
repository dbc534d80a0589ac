//! HTTP server layer
//!
//! Axum server with:
//! - Employee CRUD under `/employees`
//! - OpenAPI document and docs UI under `/docs`
//! - Static assets and an HTML error page for everything else
//! - Request tracing, CORS, panic catching
//! - Graceful shutdown, and fail-fast shutdown on database errors

pub mod error;
pub mod error_page;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod shutdown;

pub use error::ApiError;
pub use server::{build_router, run_server, serve, AppState};
pub use shutdown::FatalSignal;
