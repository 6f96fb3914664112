use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A note attached to a task. Only its creator may delete it.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub task_id: Uuid,
    pub content: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(input: NoteInput, task_id: Uuid, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            content: input.content,
            created_by,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NoteInput {
    #[validate(length(min = 1, message = "Note content is required"))]
    pub content: String,
}
