//! Route definitions for the `/assignacions-guardia` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assignment;
use crate::state::AppState;

/// Routes mounted at `/assignacions-guardia`. There is no DELETE.
///
/// ```text
/// GET, POST   /             -> list, create
/// POST        /auto-assign  -> auto_assign
/// GET, PUT    /{id}         -> get_by_id, reassign
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assignment::list).post(assignment::create))
        .route("/auto-assign", post(assignment::auto_assign))
        .route(
            "/{id}",
            get(assignment::get_by_id).put(assignment::reassign),
        )
}
