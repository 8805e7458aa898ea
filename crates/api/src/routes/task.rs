//! Route definitions for the `/tasques` resource and its attachments.

use axum::routing::get;
use axum::Router;

use crate::handlers::{task, task_attachment};
use crate::state::AppState;

/// Routes mounted at `/tasques`.
///
/// ```text
/// GET, POST          /                           -> list, create
/// GET, PUT, DELETE   /{id}                       -> get_by_id, update, delete
/// GET, POST          /{id}/adjunts               -> list, upload (multipart)
/// GET, DELETE        /{id}/adjunts/{adjunt_id}   -> download, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::list).post(task::create))
        .route(
            "/{id}",
            get(task::get_by_id).put(task::update).delete(task::delete),
        )
        .route(
            "/{id}/adjunts",
            get(task_attachment::list).post(task_attachment::upload),
        )
        .route(
            "/{id}/adjunts/{adjunt_id}",
            get(task_attachment::download).delete(task_attachment::delete),
        )
}
