//! Route definitions for the `/guardies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::guard;
use crate::state::AppState;

/// Routes mounted at `/guardies`.
///
/// ```text
/// GET, POST          /      -> list, create
/// GET, PUT, DELETE   /{id}  -> get_by_id, update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(guard::list).post(guard::create))
        .route(
            "/{id}",
            get(guard::get_by_id).put(guard::update).delete(guard::delete),
        )
}
