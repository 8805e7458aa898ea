//! Task and task attachment models and DTOs.

use chrono::NaiveDate;
use guardies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub due_date: Option<NaiveDate>,
    pub assigned_professor_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_professor_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
    pub due_date: Option<NaiveDate>,
    pub assigned_professor_id: Option<DbId>,
}

/// A file attached to a task. The file itself lives on disk.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskAttachment {
    pub id: DbId,
    pub task_id: DbId,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// Path on the server; not exposed to clients.
    #[serde(skip_serializing)]
    pub storage_path: String,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateTaskAttachment {
    pub task_id: DbId,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_path: String,
    pub uploaded_by: Option<DbId>,
}
