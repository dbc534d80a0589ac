//! Repository implementations for database access
//!
//! Each repository owns its SQL as `Statement` constants and decodes
//! rows into typed models.

pub mod employees;

pub use employees::EmployeeRepo;
