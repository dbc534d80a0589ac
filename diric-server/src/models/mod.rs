//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod employee;
pub mod validation;

pub use employee::{Employee, EmployeeId, NewEmployee, PositionChange};
pub use validation::ValidationError;
