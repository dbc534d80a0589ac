//! diric-server: HTTP API over the `employees` table
//!
//! Exposes list/get/create/update/delete for employees, an OpenAPI
//! document with a docs UI, static assets and a generic error page.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseConfig, DiricConfig, ServerConfig};
pub use db::{Database, DbError, MemoryDatabase, PgDatabase};
pub use error::{Result, ServerError};
pub use http::{build_router, run_server, AppState};
