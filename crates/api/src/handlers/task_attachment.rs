//! Handlers for `/tasques/{id}/adjunts` (files attached to a task).

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use guardies_core::error::CoreError;
use guardies_core::roles::is_manager_role;
use guardies_core::task::sanitize_file_name;
use guardies_core::types::DbId;
use guardies_db::models::task::{CreateTaskAttachment, TaskAttachment};
use guardies_db::repositories::{TaskAttachmentRepo, TaskRepo};

use super::task::{task_dir, task_not_found};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn attachment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "TaskAttachment",
        id,
    })
}

async fn ensure_task(state: &AppState, task_id: DbId) -> AppResult<()> {
    TaskRepo::find_by_id(&state.pool, task_id)
        .await?
        .ok_or_else(|| task_not_found(task_id))?;
    Ok(())
}

/// `Content-Disposition` value safe for any stored name. Non-ASCII
/// characters and quotes are replaced.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{ascii}\"")
}

/// POST /api/tasques/{id}/adjunts
///
/// Multipart upload with a single `file` field.
pub async fn upload(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<TaskAttachment>>)> {
    ensure_task(&state, task_id).await?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = sanitize_file_name(field.file_name().unwrap_or(""));
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some((file_name, content_type, data.to_vec()));
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let dir = task_dir(&state, task_id);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let path = dir.join(format!("{}_{file_name}", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let input = CreateTaskAttachment {
        task_id,
        file_name,
        content_type,
        size_bytes: data.len() as i64,
        storage_path: path.to_string_lossy().to_string(),
        uploaded_by: Some(user.professor_id),
    };
    let attachment = match TaskAttachmentRepo::create(&state.pool, &input).await {
        Ok(attachment) => attachment,
        Err(e) => {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        task_id,
        attachment_id = attachment.id,
        size_bytes = attachment.size_bytes,
        "Attachment uploaded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: attachment })))
}

/// GET /api/tasques/{id}/adjunts
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TaskAttachment>>>> {
    ensure_task(&state, task_id).await?;
    let attachments = TaskAttachmentRepo::list_by_task(&state.pool, task_id).await?;
    Ok(Json(DataResponse { data: attachments }))
}

/// GET /api/tasques/{id}/adjunts/{adjunt_id}
///
/// Download the stored file.
pub async fn download(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path((task_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let attachment = TaskAttachmentRepo::find(&state.pool, task_id, id)
        .await?
        .ok_or_else(|| attachment_not_found(id))?;

    let data = tokio::fs::read(&attachment.storage_path).await.map_err(|e| {
        AppError::InternalError(format!(
            "Attachment {id} is missing from storage: {e}"
        ))
    })?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, attachment.content_type.clone()),
            (CONTENT_DISPOSITION, content_disposition(&attachment.file_name)),
        ],
        data,
    ))
}

/// DELETE /api/tasques/{id}/adjunts/{adjunt_id}
///
/// Only the uploader or a manager may delete.
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((task_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let attachment = TaskAttachmentRepo::find(&state.pool, task_id, id)
        .await?
        .ok_or_else(|| attachment_not_found(id))?;
    if attachment.uploaded_by != Some(user.professor_id) && !is_manager_role(&user.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the uploader or a manager can delete this attachment".into(),
        )));
    }

    let removed = TaskAttachmentRepo::delete(&state.pool, task_id, id)
        .await?
        .ok_or_else(|| attachment_not_found(id))?;

    if let Err(e) = tokio::fs::remove_file(&removed.storage_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(attachment_id = id, error = %e, "Failed to remove attachment file");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
