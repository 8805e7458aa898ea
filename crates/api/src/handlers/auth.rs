//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use guardies_core::error::CoreError;
use guardies_core::types::DbId;
use guardies_db::models::professor::Professor;
use guardies_db::models::session::CreateSession;
use guardies_db::repositories::{ProfessorRepo, SessionRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed logins before the account is locked.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a locked account stays locked, in minutes.
pub const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub professor: ProfessorInfo,
}

#[derive(Debug, Serialize)]
pub struct ProfessorInfo {
    pub id: DbId,
    pub email: String,
    pub role: String,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Professors without a password (e.g.
/// imported from CSV and never activated) cannot log in.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let professor = ProfessorRepo::find_credentials_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if let Some(locked_until) = professor.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let hash = professor.password_hash.as_deref().ok_or_else(invalid_credentials)?;
    let password_valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
        ProfessorRepo::record_login_failure(&state.pool, professor.id, MAX_FAILED_ATTEMPTS, lock_until)
            .await?;
        tracing::info!(professor_id = professor.id, "Failed login attempt");
        return Err(invalid_credentials());
    }

    ProfessorRepo::record_login_success(&state.pool, professor.id).await?;
    let response =
        create_auth_response(&state, professor.id, &professor.email, &professor.role).await?;
    Ok(Json(response))
}

/// POST /api/auth/refresh
///
/// Exchange a live refresh token for a new pair. The old session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let professor = ProfessorRepo::find_by_id(&state.pool, session.professor_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Professor no longer exists".into()))
        })?;

    let response =
        create_auth_response(&state, professor.id, &professor.email, &professor.role).await?;
    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Revoke every session of the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_professor(&state.pool, auth_user.professor_id).await?;
    tracing::debug!(professor_id = auth_user.professor_id, revoked, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Professor>>> {
    let professor = ProfessorRepo::find_by_id(&state.pool, auth_user.professor_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Professor",
            id: auth_user.professor_id,
        }))?;
    Ok(Json(DataResponse { data: professor }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue an access + refresh token pair and persist the session.
async fn create_auth_response(
    state: &AppState,
    professor_id: DbId,
    email: &str,
    role: &str,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(professor_id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            professor_id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        professor: ProfessorInfo {
            id: professor_id,
            email: email.to_string(),
            role: role.to_string(),
        },
    })
}
