//! In-memory backend, selected with `diric serve --memory` and used by
//! the router tests
//!
//! Understands the employee repository's statements and [`PING`] by name.
//! Anything else is a backend error. A failure can be queued with
//! [`MemoryDatabase::fail_next`] to exercise database error paths.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::repos::employees::{
    DELETE_EMPLOYEE, GET_EMPLOYEE, INSERT_EMPLOYEE, LIST_EMPLOYEES, UPDATE_POSITION,
};
use super::{Database, DbError, QueryOutcome, Replacements, Row, Statement, Value, PING};
use crate::models::Employee;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Employee>,
    pending_failure: Option<String>,
}

/// `Database` backed by a mutex-guarded map
#[derive(Default)]
pub struct MemoryDatabase {
    table: Mutex<Table>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next statement fail with `message`
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().pending_failure = Some(message.into());
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `employee` as-is, bypassing request validation. Returns the
    /// assigned id; `employee.id` is ignored.
    pub fn insert(&self, employee: Employee) -> i64 {
        let mut table = self.lock();
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, Employee { id, ..employee });
        id
    }

    /// Snapshot of a stored row
    pub fn row(&self, id: i64) -> Option<Employee> {
        self.lock().rows.get(&id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn execute(
        &self,
        statement: &Statement,
        replacements: &Replacements,
    ) -> Result<QueryOutcome, DbError> {
        let mut table = self.lock();
        if let Some(message) = table.pending_failure.take() {
            return Err(DbError::Backend(message));
        }

        let name = statement.name();
        if name == PING.name() {
            let mut row = Row::new();
            row.insert("ok".to_string(), 1.into());
            Ok(QueryOutcome::Rows(vec![row]))
        } else if name == LIST_EMPLOYEES.name() {
            let rows = table.rows.values().map(to_row).collect::<Result<_, _>>()?;
            Ok(QueryOutcome::Rows(rows))
        } else if name == GET_EMPLOYEE.name() {
            let id = int(replacements, "id")?;
            let rows = table.rows.get(&id).map(to_row).transpose()?;
            Ok(QueryOutcome::Rows(rows.into_iter().collect()))
        } else if name == INSERT_EMPLOYEE.name() {
            table.next_id += 1;
            let id = table.next_id;
            let employee = Employee {
                id,
                name: Some(text(replacements, "name")?),
                soname: Some(text(replacements, "soname")?),
                position: Some(text(replacements, "position")?),
                description: Some(text(replacements, "description")?),
            };
            table.rows.insert(id, employee);

            let mut row = Row::new();
            row.insert("id".to_string(), id.into());
            Ok(QueryOutcome::Rows(vec![row]))
        } else if name == UPDATE_POSITION.name() {
            let id = int(replacements, "id")?;
            let position = text(replacements, "position")?;
            let rows_affected = match table.rows.get_mut(&id) {
                Some(employee) => {
                    employee.position = Some(position);
                    1
                }
                None => 0,
            };
            Ok(QueryOutcome::Ack { rows_affected })
        } else if name == DELETE_EMPLOYEE.name() {
            let id = int(replacements, "id")?;
            let rows_affected = u64::from(table.rows.remove(&id).is_some());
            Ok(QueryOutcome::Ack { rows_affected })
        } else {
            Err(DbError::Backend(format!("unsupported statement '{}'", name)))
        }
    }
}

fn to_row(employee: &Employee) -> Result<Row, DbError> {
    match serde_json::to_value(employee) {
        Ok(serde_json::Value::Object(row)) => Ok(row),
        Ok(_) => Err(DbError::Backend("employee did not serialize to an object".into())),
        Err(e) => Err(DbError::Backend(e.to_string())),
    }
}

fn int(replacements: &Replacements, name: &str) -> Result<i64, DbError> {
    replacements
        .get(name)
        .and_then(Value::as_int)
        .ok_or_else(|| DbError::MissingReplacement {
            name: name.to_owned(),
        })
}

fn text(replacements: &Replacements, name: &str) -> Result<String, DbError> {
    replacements
        .get(name)
        .and_then(Value::as_text)
        .map(str::to_owned)
        .ok_or_else(|| DbError::MissingReplacement {
            name: name.to_owned(),
        })
}
