//! Command implementations for the diric CLI

pub mod config;
pub mod docs;
pub mod serve;

pub use config::run_config;
pub use docs::run_docs;
pub use serve::run_serve;
