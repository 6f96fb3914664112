use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Workflow status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    OnHold,
    InProgress,
    UnderReview,
    Completed,
}

/// Input structure for creating or updating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, max = 200, message = "Task name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 1000, message = "Task description is required"))]
    pub description: String,
}

/// Status-change payload for `POST .../tasks/{id}/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskStatusInput {
    pub status: TaskStatus,
}

/// A task belonging to a project.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// New tasks start in `Pending`.
    pub fn new(input: TaskInput, project_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            name: input.name,
            description: input.description,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
