//! Route definitions for the `/sortides` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::outing;
use crate::state::AppState;

/// Routes mounted at `/sortides`.
///
/// ```text
/// GET, POST          /                               -> list, create
/// GET, PUT, DELETE   /{id}                           -> get_by_id, update, delete
/// GET                /{id}/classes-substituir        -> classes_to_substitute
/// GET, POST          /{id}/substitucions             -> list, propose
/// POST               /{id}/confirmar-substitucions   -> confirm_substitutions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(outing::list).post(outing::create))
        .route(
            "/{id}",
            get(outing::get_by_id)
                .put(outing::update)
                .delete(outing::delete),
        )
        .route(
            "/{id}/classes-substituir",
            get(outing::classes_to_substitute),
        )
        .route(
            "/{id}/substitucions",
            get(outing::list_substitutions).post(outing::propose_substitutions),
        )
        .route(
            "/{id}/confirmar-substitucions",
            post(outing::confirm_substitutions),
        )
}
