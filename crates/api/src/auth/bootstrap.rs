//! First-run director account.
//!
//! A fresh database has nobody who can log in, and every write needs a
//! manager. When `BOOTSTRAP_DIRECTOR_EMAIL` / `BOOTSTRAP_DIRECTOR_PASSWORD`
//! are set and no professor has a password yet, a director is created.

use guardies_core::error::CoreError;
use guardies_core::roles::ROLE_DIRECTOR;
use guardies_core::validation::validate_email;
use guardies_db::models::professor::CreateProfessor;
use guardies_db::repositories::ProfessorRepo;
use sqlx::PgPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::BootstrapDirector;
use crate::error::AppError;

/// Create the bootstrap director if nobody can log in yet.
///
/// Returns `true` when an account was created.
pub async fn ensure_director(pool: &PgPool, director: &BootstrapDirector) -> Result<bool, AppError> {
    if ProfessorRepo::count_with_login(pool).await? > 0 {
        return Ok(false);
    }

    validate_email(&director.email)?;
    validate_password_strength(&director.password)?;
    let password_hash = hash_password(&director.password)
        .map_err(|e| AppError::Core(CoreError::Internal(format!("Password hashing error: {e}"))))?;

    let professor = ProfessorRepo::create(
        pool,
        &CreateProfessor {
            name: "Direcció".to_string(),
            surname: "Centre".to_string(),
            email: director.email.trim().to_lowercase(),
            role: Some(ROLE_DIRECTOR.to_string()),
            department: None,
            password_hash: Some(password_hash),
        },
    )
    .await?;

    tracing::info!(professor_id = professor.id, email = %professor.email, "Bootstrap director created");
    Ok(true)
}
