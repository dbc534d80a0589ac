//! Database layer - statement execution and repositories
//!
//! # Design Principles
//!
//! - One operation: execute a parameterized statement, get rows or an ack
//! - Named `:placeholders` are bound by the driver, never interpolated
//! - Backends are injected as `Arc<dyn Database>`, built once at startup
//! - No retries, no transactions; each statement stands alone

pub mod memory;
pub mod params;
pub mod pool;
pub mod repos;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

pub use memory::MemoryDatabase;
pub use params::{compile, CompiledStatement};
pub use pool::{create_pool, PgDatabase};
pub use repos::EmployeeRepo;

/// Cheapest statement that proves the backend is reachable
pub const PING: Statement = Statement::query("health.ping", "SELECT 1 AS ok");

/// A result row, keyed by column name
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("no replacement for placeholder ':{name}'")]
    MissingReplacement { name: String },

    #[error("unexpected result from '{statement}': {reason}")]
    Decode {
        statement: &'static str,
        reason: String,
    },

    #[error("backend error: {0}")]
    Backend(String),
}

/// Whether a statement yields rows or only an acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Query,
    Command,
}

/// SQL text with named `:placeholders` and a stable label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    name: &'static str,
    sql: &'static str,
    kind: StatementKind,
}

impl Statement {
    /// A statement that returns rows
    pub const fn query(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            sql,
            kind: StatementKind::Query,
        }
    }

    /// A statement that returns only an affected-row count
    pub const fn command(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            sql,
            kind: StatementKind::Command,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn sql(&self) -> &'static str {
        self.sql
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }
}

/// Scalar value bound to a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Replacement map: placeholder name to bound value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements(BTreeMap<&'static str, Value>);

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a statement produced
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<Row>),
    Ack { rows_affected: u64 },
}

/// Statement executor (testable)
#[async_trait]
pub trait Database: Send + Sync {
    async fn execute(
        &self,
        statement: &Statement,
        replacements: &Replacements,
    ) -> Result<QueryOutcome, DbError>;
}
