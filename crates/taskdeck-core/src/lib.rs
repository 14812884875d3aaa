//! Task records and the durable task store.
//!
//! This crate owns the task schema and its invariants: ids and creation
//! timestamps are immutable, every task belongs to exactly one user, and
//! only the three enumerated priorities are ever persisted.

mod store;
mod types;

/// Store trait, SQLite implementation, and store errors.
pub use store::{SqliteTaskStore, StoreError, TaskStore};
/// Task record types.
pub use types::{Priority, Task, TaskDraft, TaskId, TaskPatch};
