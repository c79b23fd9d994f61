//! Task store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide fetch-all/create/rename/delete over the `tasks` table.
//! - Decode rows strictly and report corrupt data instead of masking it.
//!
//! # Invariants
//! - `fetch_all` returns tasks in insertion order (`seq ASC`).
//! - `rename` mutates the in-memory task only after the write succeeded.
//! - No title validation happens here; blank titles are a controller concern.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::task::{Task, TaskId};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT uuid, title FROM tasks";
const REQUIRED_TABLE: &str = "tasks";
const REQUIRED_COLUMNS: &[&str] = &["seq", "uuid", "title", "created_at", "updated_at"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure raised by task store operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of a rename request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// New title persisted and applied to the task.
    Renamed,
    /// Title was identical; nothing was written.
    Unchanged,
}

/// Persistence contract for task records.
pub trait TaskStore {
    fn fetch_all(&self) -> StoreResult<Vec<Task>>;
    fn create(&self, title: &str) -> StoreResult<Task>;
    fn rename(&self, task: &mut Task, title: &str) -> StoreResult<RenameOutcome>;
    fn delete(&self, task: &Task) -> StoreResult<Task>;
}

/// SQLite-backed task store.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the layout is
    ///   not the one this binary writes.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn fetch_all(&self) -> StoreResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn create(&self, title: &str) -> StoreResult<Task> {
        let task = Task::new(title);
        self.conn.execute(
            "INSERT INTO tasks (uuid, title) VALUES (?1, ?2);",
            params![task.id.to_string(), task.title.as_str()],
        )?;
        debug!("event=task_insert module=repo status=ok task_id={}", task.id);
        Ok(task)
    }

    fn rename(&self, task: &mut Task, title: &str) -> StoreResult<RenameOutcome> {
        if task.title == title {
            return Ok(RenameOutcome::Unchanged);
        }

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2;",
            params![title, task.id.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(task.id));
        }

        // Why: the caller's row still shows this task; it must only change
        // once the new title is on disk, or a failed save leaves it dirty.
        task.title = title.to_string();
        Ok(RenameOutcome::Renamed)
    }

    fn delete(&self, task: &Task) -> StoreResult<Task> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [task.id.to_string()])?;

        if changed == 0 {
            return Err(StoreError::NotFound(task.id));
        }

        debug!("event=task_delete module=repo status=ok task_id={}", task.id);
        Ok(task.clone())
    }
}

fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [REQUIRED_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(StoreError::MissingRequiredTable(REQUIRED_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({REQUIRED_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name.as_str() == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: REQUIRED_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    Ok(Task::with_id(id, row.get::<_, String>("title")?))
}
