//! Application state for the taskdeck TUI.
//!
//! Holds exactly the transient client state: the fetched task list, the
//! new-task input buffer, the client-side search filter, the server-side
//! priority filter, and an edit buffer for at most one task at a time.

use log::debug;
use taskdeck_core::{Priority, Task, TaskId};

/// Which pane owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The new-task input line.
    Input,
    /// The search line.
    Search,
    /// The task list.
    List,
}

/// Draft for the task currently being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    /// Id of the task being edited.
    pub id: TaskId,
    /// Title draft.
    pub title: String,
    /// Priority draft.
    pub priority: Priority,
}

/// Top-level application state for the TUI.
pub struct App {
    /// Tasks as last fetched from the server, newest first.
    pub tasks: Vec<Task>,
    /// New-task input buffer.
    pub input: String,
    /// Priority selected for the next new task.
    pub input_priority: Priority,
    /// Free-text search, matched case-insensitively against titles.
    pub search: String,
    /// Server-side priority filter; `None` shows all priorities.
    pub priority_filter: Option<Priority>,
    /// Edit buffer for at most one task.
    pub editing: Option<EditBuffer>,
    /// Index of the selected row within the visible tasks.
    pub selected: usize,
    /// Pane that currently owns input.
    pub focus: Focus,
    /// Status line text.
    pub status: String,
    /// This client's persisted user id.
    pub user_id: String,
    /// Server base URL, shown in the header.
    pub server_url: String,
}

impl App {
    /// Create a new application state with defaults.
    pub fn new(user_id: String, server_url: String) -> Self {
        Self {
            tasks: Vec::new(),
            input: String::new(),
            input_priority: Priority::Low,
            search: String::new(),
            priority_filter: None,
            editing: None,
            selected: 0,
            focus: Focus::Input,
            status: "ready".to_string(),
            user_id,
            server_url,
        }
    }

    /// Replace the task list after a fetch.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        debug!("set tasks (count={})", tasks.len());
        self.tasks = tasks;
        self.clamp_selection();
    }

    /// Tasks passing the client-side search filter, in server order.
    ///
    /// Search is a case-insensitive substring match on the title; the
    /// server knows nothing about it.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        if self.search.is_empty() {
            return self.tasks.iter().collect();
        }
        let needle = self.search.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| task.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// The task under the cursor, if any.
    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected).copied()
    }

    /// Move the selection up one row.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the selection down one row.
    pub fn select_next(&mut self) {
        let visible = self.visible_tasks().len();
        if self.selected + 1 < visible {
            self.selected += 1;
        }
    }

    /// Add a freshly created task. The list is newest first, so it lands
    /// at the front.
    pub fn insert_task(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Replace a task in place after an update.
    pub fn replace_task(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            *slot = task;
        }
    }

    /// Drop a task after a delete.
    pub fn remove_task(&mut self, id: TaskId) {
        self.tasks.retain(|task| task.id != id);
        self.clamp_selection();
    }

    /// Cycle the server-side priority filter: All -> Low -> Medium ->
    /// High -> All. The caller refetches after a change.
    pub fn cycle_priority_filter(&mut self) {
        self.priority_filter = match self.priority_filter {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::High),
            Some(Priority::High) => None,
        };
        self.selected = 0;
    }

    /// Cycle the priority attached to the next new task.
    pub fn cycle_input_priority(&mut self) {
        self.input_priority = next_priority(self.input_priority);
    }

    /// Load the selected task into the edit buffer, replacing any
    /// previous edit in progress.
    pub fn start_editing(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let buffer = EditBuffer {
            id: task.id,
            title: task.title.clone(),
            priority: task.priority,
        };
        debug!("editing task (id={})", buffer.id);
        self.editing = Some(buffer);
    }

    /// Discard the edit buffer.
    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Cycle the priority draft of the task being edited.
    pub fn cycle_editing_priority(&mut self) {
        if let Some(editing) = self.editing.as_mut() {
            editing.priority = next_priority(editing.priority);
        }
    }

    /// Move focus to the next pane.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Search,
            Focus::Search => Focus::List,
            Focus::List => Focus::Input,
        };
    }

    /// Set the status line.
    pub fn push_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_tasks().len();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }
}

fn next_priority(priority: Priority) -> Priority {
    match priority {
        Priority::Low => Priority::Medium,
        Priority::Medium => Priority::High,
        Priority::High => Priority::Low,
    }
}
