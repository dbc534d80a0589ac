//! Error types for diric-server

use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that stop the server from starting or keep it from running.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A database failure escalated by fail-fast mode.
    #[error("FATAL ERROR: {0}")]
    Fatal(String),
}
