//! HTTP client for the task API.

use anyhow::{Context, Result};
use log::{debug, info};
use taskdeck_core::{Priority, Task, TaskId, TaskPatch};

/// Client bound to one server and one user identity.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl ApiClient {
    /// Create a new client for the given server URL and user id.
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            user_id: user_id.into(),
        }
    }

    /// Fetch this user's tasks, newest first, optionally filtered by
    /// priority. Search is applied client-side, never here.
    pub async fn list_tasks(&self, priority: Option<Priority>) -> Result<Vec<Task>> {
        let mut request = self
            .http
            .get(format!("{}/tasks", self.base_url))
            .query(&[("userId", self.user_id.as_str())]);
        if let Some(priority) = priority {
            request = request.query(&[("priority", priority.as_str())]);
        }
        let tasks: Vec<Task> = request
            .send()
            .await
            .context("list tasks request failed")?
            .error_for_status()
            .context("list tasks rejected")?
            .json()
            .await
            .context("invalid list tasks response")?;
        debug!("listed tasks (count={})", tasks.len());
        Ok(tasks)
    }

    /// Create a task owned by this user.
    pub async fn create_task(&self, title: &str, priority: Priority) -> Result<Task> {
        info!(
            "creating task (title_len={}, priority={})",
            title.len(),
            priority.as_str()
        );
        let body = serde_json::json!({
            "title": title,
            "priority": priority,
            "userId": self.user_id,
        });
        let task = self
            .http
            .post(format!("{}/tasks", self.base_url))
            .json(&body)
            .send()
            .await
            .context("create task request failed")?
            .error_for_status()
            .context("create task rejected")?
            .json()
            .await
            .context("invalid create task response")?;
        Ok(task)
    }

    /// Apply a partial update and return the updated record.
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        debug!("updating task (id={})", id);
        let task = self
            .http
            .put(format!("{}/tasks/{id}", self.base_url))
            .json(patch)
            .send()
            .await
            .context("update task request failed")?
            .error_for_status()
            .context("update task rejected")?
            .json()
            .await
            .context("invalid update task response")?;
        Ok(task)
    }

    /// Delete a task. Succeeds even when the id is already gone.
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        debug!("deleting task (id={})", id);
        self.http
            .delete(format!("{}/tasks/{id}", self.base_url))
            .send()
            .await
            .context("delete task request failed")?
            .error_for_status()
            .context("delete task rejected")?;
        Ok(())
    }
}
