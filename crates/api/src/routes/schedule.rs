//! Route definitions for the `/horaris` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::schedule;
use crate::state::AppState;

/// Routes mounted at `/horaris`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schedule::list).post(schedule::create))
        .route(
            "/{id}",
            get(schedule::get_by_id)
                .put(schedule::update)
                .delete(schedule::delete),
        )
}
