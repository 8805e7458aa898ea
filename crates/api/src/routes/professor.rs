//! Route definitions for the `/professors` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::professor;
use crate::state::AppState;

/// Routes mounted at `/professors`.
///
/// ```text
/// GET, POST          /                        -> list, create
/// GET, PUT, DELETE   /{id}                    -> get_by_id, update, delete
/// GET                /available/{guardia_id}  -> available_for_guard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(professor::list).post(professor::create))
        .route(
            "/{id}",
            get(professor::get_by_id)
                .put(professor::update)
                .delete(professor::delete),
        )
        .route("/available/{guardia_id}", get(professor::available_for_guard))
}
