//! Route handlers organized by resource

pub mod docs;
pub mod employees;
pub mod health;
