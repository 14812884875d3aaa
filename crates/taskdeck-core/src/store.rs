//! Durable task persistence backed by SQLite.

use crate::types::{Priority, Task, TaskDraft, TaskId, TaskPatch};
use chrono::Utc;
use log::{debug, info, warn};
use parking_lot::Mutex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use std::fs;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the task store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistent keyed collection of task records.
///
/// The store is the only component that reads or writes persistent state.
/// Single-record atomicity only; tasks are independent of each other.
pub trait TaskStore: Send + Sync {
    /// List tasks owned by `user_id`, newest first, optionally restricted
    /// to a single priority. Returns an empty vec when nothing matches.
    fn list(&self, user_id: &str, priority: Option<Priority>) -> Result<Vec<Task>, StoreError>;
    /// Create a task with a fresh id, `completed = false`, and the
    /// creation timestamp set to now.
    fn create(&self, draft: TaskDraft) -> Result<Task, StoreError>;
    /// Apply a partial update and stamp `updated_at`. Fields absent from
    /// the patch are left untouched. Returns `None` when the id is unknown.
    fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>, StoreError>;
    /// Remove a task. Returns whether a record existed; deleting an
    /// unknown id is a successful no-op.
    fn delete(&self, id: TaskId) -> Result<bool, StoreError>;
}

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    priority TEXT NOT NULL DEFAULT 'Low',
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id);
";

const TASK_COLUMNS: &str = "id, title, completed, priority, user_id, created_at, updated_at";

/// SQLite-backed task store.
pub struct SqliteTaskStore {
    /// Connection handle; rusqlite connections are not `Sync`.
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Open (or create) the database at `path`, creating parent
    /// directories and the schema as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!("opened task database (path={})", path.display());
        Self::with_connection(conn)
    }

    /// Open a fresh in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl TaskStore for SqliteTaskStore {
    fn list(&self, user_id: &str, priority: Option<Priority>) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.lock();
        let mut tasks = Vec::new();
        match priority {
            Some(priority) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks \
                     WHERE user_id = ?1 AND priority = ?2 \
                     ORDER BY created_at DESC, id ASC"
                ))?;
                let rows = stmt.query_map(params![user_id, priority], row_to_task)?;
                for row in rows {
                    tasks.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks \
                     WHERE user_id = ?1 \
                     ORDER BY created_at DESC, id ASC"
                ))?;
                let rows = stmt.query_map(params![user_id], row_to_task)?;
                for row in rows {
                    tasks.push(row?);
                }
            }
        }
        debug!("listed tasks (user_id={}, count={})", user_id, tasks.len());
        Ok(tasks)
    }

    fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = Task {
            id: Uuid::new_v4(),
            title: draft.title,
            completed: false,
            priority: draft.priority,
            user_id: draft.user_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tasks (id, title, completed, priority, user_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task.id.to_string(),
                task.title,
                task.completed,
                task.priority,
                task.user_id,
                task.created_at,
            ],
        )?;
        info!("created task (id={}, user_id={})", task.id, task.user_id);
        Ok(task)
    }

    fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>, StoreError> {
        let updated_at = Utc::now();
        let conn = self.conn.lock();
        // COALESCE keeps stored values for fields absent from the patch, so
        // an omitted `completed` can never revert to a default.
        let changed = conn.execute(
            "UPDATE tasks SET \
                 title = COALESCE(?2, title), \
                 completed = COALESCE(?3, completed), \
                 priority = COALESCE(?4, priority), \
                 updated_at = ?5 \
             WHERE id = ?1",
            params![
                id.to_string(),
                patch.title,
                patch.completed,
                patch.priority,
                updated_at,
            ],
        )?;
        if changed == 0 {
            warn!("update for unknown task (id={})", id);
            return Ok(None);
        }
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id.to_string()],
                row_to_task,
            )
            .optional()?;
        debug!("updated task (id={})", id);
        Ok(task)
    }

    fn delete(&self, id: TaskId) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])?;
        if changed > 0 {
            info!("deleted task (id={})", id);
            Ok(true)
        } else {
            debug!("delete for unknown task (id={})", id);
            Ok(false)
        }
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Priority::parse(text).ok_or(FromSqlError::InvalidType)
    }
}

/// Map a `tasks` row (in `TASK_COLUMNS` order) into a record.
fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))?;
    Ok(Task {
        id,
        title: row.get(1)?,
        completed: row.get(2)?,
        priority: row.get(3)?,
        user_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{SqliteTaskStore, TaskStore};
    use crate::types::{Priority, TaskDraft, TaskPatch};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn draft(title: &str, priority: Priority, user_id: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            priority,
            user_id: user_id.to_string(),
        }
    }

    #[test]
    fn create_list_update_delete_round_trip() {
        let store = SqliteTaskStore::open_in_memory().expect("store");
        let task = store
            .create(draft("Buy milk", Priority::Medium, "u1"))
            .expect("create");
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
        assert_eq!(task.updated_at, None);

        let listed = store.list("u1", None).expect("list");
        assert_eq!(listed, vec![task.clone()]);

        let updated = store
            .update(
                task.id,
                TaskPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .expect("update")
            .expect("task");
        assert_eq!(updated.id, task.id);
        assert!(updated.completed);
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.priority, Priority::Medium);
        assert_eq!(updated.created_at, task.created_at);
        let updated_at = updated.updated_at.expect("updated_at");
        assert!(updated_at >= updated.created_at);

        assert!(store.delete(task.id).expect("delete"));
        assert_eq!(store.list("u1", None).expect("list"), vec![]);
    }

    #[test]
    fn update_unknown_id_returns_none() {
        let store = SqliteTaskStore::open_in_memory().expect("store");
        let result = store
            .update(Uuid::new_v4(), TaskPatch::default())
            .expect("update");
        assert_eq!(result, None);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let store = SqliteTaskStore::open_in_memory().expect("store");
        assert!(!store.delete(Uuid::new_v4()).expect("delete"));
    }

    #[test]
    fn open_creates_parent_directories() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("tasks.db");
        let store = SqliteTaskStore::open(&path).expect("store");
        store
            .create(draft("Persist me", Priority::Low, "u1"))
            .expect("create");
        assert!(path.exists());

        // Reopen and confirm the record survived.
        drop(store);
        let reopened = SqliteTaskStore::open(&path).expect("reopen");
        let listed = reopened.list("u1", None).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Persist me");
    }
}
