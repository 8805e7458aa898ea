//! Route definitions for `/import`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Routes mounted at `/import`.
///
/// ```text
/// POST /csv?entity=<name>  -> import_csv (body = CSV file)
/// GET  /csv/columns        -> columns
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/csv", post(import::import_csv))
        .route("/csv/columns", get(import::columns))
}
