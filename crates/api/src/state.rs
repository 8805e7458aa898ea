use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the pool is reference-counted internally).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: guardies_db::DbPool,
    /// Server configuration (JWT settings, upload limits, storage paths).
    pub config: Arc<ServerConfig>,
}
