//! PostgreSQL backend
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is created
//! once at startup and shared through `Arc<dyn Database>`.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{Column, ConnectOptions, PgPool, Row as _, TypeInfo};

use super::{compile, Database, DbError, QueryOutcome, Replacements, Row, Statement, StatementKind, Value};
use crate::config::DatabaseConfig;

/// Build connect options from config; `url` wins over the discrete fields.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let options = match &config.url {
        Some(url) => url.parse::<PgConnectOptions>()?,
        None => PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name),
    };

    // Statement logging is handled in `PgDatabase::execute`
    Ok(options.disable_statement_logging())
}

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options(config)?)
        .await
}

/// `Database` over a PostgreSQL pool
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
    log_queries: bool,
}

impl PgDatabase {
    pub fn new(pool: PgPool, log_queries: bool) -> Self {
        Self { pool, log_queries }
    }

    /// Connect using `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = create_pool(config).await?;
        tracing::info!(
            max_connections = config.max_connections,
            log_queries = config.log_queries,
            "database pool ready"
        );
        Ok(Self::new(pool, config.log_queries))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn execute(
        &self,
        statement: &Statement,
        replacements: &Replacements,
    ) -> Result<QueryOutcome, DbError> {
        let compiled = compile(statement.sql(), replacements)?;
        if self.log_queries {
            tracing::info!(statement = statement.name(), sql = %compiled.sql, "executing");
        } else {
            tracing::debug!(statement = statement.name(), "executing");
        }

        let mut query = sqlx::query(&compiled.sql);
        for value in &compiled.values {
            query = match value {
                Value::Int(v) => query.bind(*v),
                Value::Text(s) => query.bind(s.as_str()),
            };
        }

        match statement.kind() {
            StatementKind::Query => {
                let rows = query.fetch_all(&self.pool).await?;
                let rows = rows
                    .iter()
                    .map(row_to_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(QueryOutcome::Rows(rows))
            }
            StatementKind::Command => {
                let result = query.execute(&self.pool).await?;
                Ok(QueryOutcome::Ack {
                    rows_affected: result.rows_affected(),
                })
            }
        }
    }
}

/// Decode a row into a JSON object by column type name
fn row_to_json(row: &PgRow) -> Result<Row, sqlx::Error> {
    let mut out = Row::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let value = match column.type_info().name() {
            "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(JsonValue::from),
            "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(JsonValue::from),
            "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(JsonValue::from),
            "FLOAT4" => row.try_get::<Option<f32>, _>(idx)?.map(JsonValue::from),
            "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(JsonValue::from),
            "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(JsonValue::from),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
                row.try_get::<Option<String>, _>(idx)?.map(JsonValue::from)
            }
            other => {
                tracing::debug!(column = column.name(), type_name = other, "unsupported column type");
                None
            }
        };
        out.insert(column.name().to_owned(), value.unwrap_or(JsonValue::Null));
    }
    Ok(out)
}
