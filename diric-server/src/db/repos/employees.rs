//! Employee repository
//!
//! One statement per operation:
//! - list / get: `SELECT *`, rows decoded into `Employee`
//! - create: `INSERT ... RETURNING id`
//! - update_position / delete: affected-row count, zero means no match

use crate::db::{Database, DbError, QueryOutcome, Replacements, Row, Statement};
use crate::models::{Employee, EmployeeId, NewEmployee};

pub const LIST_EMPLOYEES: Statement =
    Statement::query("employees.list", "SELECT * FROM employees ORDER BY id");

pub const GET_EMPLOYEE: Statement =
    Statement::query("employees.get", "SELECT * FROM employees WHERE id = :id");

pub const INSERT_EMPLOYEE: Statement = Statement::query(
    "employees.insert",
    r#"
    INSERT INTO employees (name, soname, position, description)
    VALUES (:name, :soname, :position, :description)
    RETURNING id
    "#,
);

pub const UPDATE_POSITION: Statement = Statement::command(
    "employees.update_position",
    "UPDATE employees SET position = :position WHERE id = :id",
);

pub const DELETE_EMPLOYEE: Statement =
    Statement::command("employees.delete", "DELETE FROM employees WHERE id = :id");

/// Employee repository
pub struct EmployeeRepo<'a> {
    db: &'a dyn Database,
}

impl<'a> EmployeeRepo<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// All employees ordered by id.
    ///
    /// `None` means the backend produced no result set at all, which is
    /// distinct from an empty table.
    pub async fn list(&self) -> Result<Option<Vec<Employee>>, DbError> {
        match self.db.execute(&LIST_EMPLOYEES, &Replacements::new()).await? {
            QueryOutcome::Rows(rows) => rows
                .into_iter()
                .map(|row| decode(&LIST_EMPLOYEES, row))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            QueryOutcome::Ack { .. } => Ok(None),
        }
    }

    pub async fn get(&self, id: EmployeeId) -> Result<Option<Employee>, DbError> {
        let replacements = Replacements::new().with("id", id.get());
        match self.db.execute(&GET_EMPLOYEE, &replacements).await? {
            QueryOutcome::Rows(rows) => rows
                .into_iter()
                .next()
                .map(|row| decode(&GET_EMPLOYEE, row))
                .transpose(),
            QueryOutcome::Ack { .. } => Ok(None),
        }
    }

    /// Insert and return the assigned id
    pub async fn create(&self, employee: &NewEmployee) -> Result<EmployeeId, DbError> {
        let replacements = Replacements::new()
            .with("name", employee.name.as_str())
            .with("soname", employee.soname.as_str())
            .with("position", employee.position.as_str())
            .with("description", employee.description.as_str());

        let outcome = self.db.execute(&INSERT_EMPLOYEE, &replacements).await?;
        let id = match outcome {
            QueryOutcome::Rows(rows) => rows
                .first()
                .and_then(|row| row.get("id"))
                .and_then(serde_json::Value::as_i64),
            QueryOutcome::Ack { .. } => None,
        };

        id.map(EmployeeId::new).ok_or(DbError::Decode {
            statement: INSERT_EMPLOYEE.name(),
            reason: "insert did not return an id".to_string(),
        })
    }

    /// Returns the number of rows changed
    pub async fn update_position(&self, id: EmployeeId, position: &str) -> Result<u64, DbError> {
        let replacements = Replacements::new()
            .with("position", position)
            .with("id", id.get());
        let outcome = self.db.execute(&UPDATE_POSITION, &replacements).await?;
        rows_affected(&UPDATE_POSITION, outcome)
    }

    /// Returns the number of rows removed
    pub async fn delete(&self, id: EmployeeId) -> Result<u64, DbError> {
        let replacements = Replacements::new().with("id", id.get());
        let outcome = self.db.execute(&DELETE_EMPLOYEE, &replacements).await?;
        rows_affected(&DELETE_EMPLOYEE, outcome)
    }
}

fn decode(statement: &Statement, row: Row) -> Result<Employee, DbError> {
    serde_json::from_value(serde_json::Value::Object(row)).map_err(|e| DbError::Decode {
        statement: statement.name(),
        reason: e.to_string(),
    })
}

fn rows_affected(statement: &Statement, outcome: QueryOutcome) -> Result<u64, DbError> {
    match outcome {
        QueryOutcome::Ack { rows_affected } => Ok(rows_affected),
        QueryOutcome::Rows(_) => Err(DbError::Decode {
            statement: statement.name(),
            reason: "expected an acknowledgment, got rows".to_string(),
        }),
    }
}
