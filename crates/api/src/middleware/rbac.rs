//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement, so authorization is visible in handler signatures.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use guardies_core::error::CoreError;
use guardies_core::roles::is_manager_role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Any authenticated professor.
///
/// ```ignore
/// async fn list(RequireAuth(_user): RequireAuth) -> AppResult<Json<()>> { ... }
/// ```
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Coordinator, head of studies or director. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn create(RequireManager(user): RequireManager) -> AppResult<Json<()>> { ... }
/// ```
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_manager_role(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Coordinator, head of studies or director role required".into(),
            )));
        }
        Ok(RequireManager(user))
    }
}
