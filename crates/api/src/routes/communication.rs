//! Route definitions for the `/comunicacions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::communication;
use crate::state::AppState;

/// Routes mounted at `/comunicacions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(communication::list).post(communication::create))
        .route(
            "/{id}",
            get(communication::get_by_id)
                .put(communication::update)
                .delete(communication::delete),
        )
}
