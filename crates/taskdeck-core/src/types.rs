//! Core data types for task records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a task.
pub type TaskId = Uuid;

/// Importance level attached to every task.
///
/// Exactly these three values are ever persisted; unrecognized input is
/// rejected at the API boundary rather than coerced.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    /// Default priority for new tasks.
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Return the priority as its capitalized wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Parse a priority from its wire string, rejecting anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Persisted task record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier, assigned by the store and immutable afterwards.
    pub id: TaskId,
    /// Free-form task text.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
    /// Task priority.
    pub priority: Priority,
    /// Opaque identifier of the owning client. Never authenticated.
    pub user_id: String,
    /// Creation timestamp, set once by the store.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent update. Absent until the first update
    /// and omitted from JSON while absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a task. The store fills in everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    /// Task text. The store accepts empty titles; clients should not
    /// submit them.
    pub title: String,
    /// Priority for the new task.
    pub priority: Priority,
    /// Owning client identifier.
    pub user_id: String,
}

/// Partial update for a task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// Replacement title, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement completion flag, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Replacement priority, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

#[cfg(test)]
mod tests {
    use super::{Priority, Task, TaskPatch};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    #[test]
    fn priority_parses_and_formats() {
        assert_eq!(Priority::parse("Low"), Some(Priority::Low));
        assert_eq!(Priority::parse("Medium"), Some(Priority::Medium));
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::parse("low"), None);
        assert_eq!(Priority::parse(""), None);
        assert_eq!(Priority::High.as_str(), "High");
        assert_eq!(Priority::default(), Priority::Low);
    }

    #[test]
    fn task_serializes_camel_case_without_updated_at() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            completed: false,
            priority: Priority::Medium,
            user_id: "u1".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let value = serde_json::to_value(&task).expect("serialize");
        let object = value.as_object().expect("object");
        assert_eq!(object["title"], "Buy milk");
        assert_eq!(object["priority"], "Medium");
        assert_eq!(object["userId"], "u1");
        assert!(object.contains_key("createdAt"));
        assert!(!object.contains_key("updatedAt"));
    }

    #[test]
    fn task_round_trips_with_updated_at() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Water plants".to_string(),
            completed: true,
            priority: Priority::High,
            user_id: "u2".to_string(),
            created_at: Utc::now(),
            updated_at: Some(Utc::now()),
        };
        let json = serde_json::to_string(&task).expect("serialize");
        let parsed: Task = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, task);
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).expect("serialize");
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), 1);
        assert_eq!(object["completed"], true);
    }
}
