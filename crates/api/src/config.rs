use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory where task attachments are written.
    pub attachments_dir: PathBuf,
    /// Largest accepted upload (attachments and CSV imports), in bytes.
    pub max_upload_bytes: usize,
    /// Director account created at startup when nobody can log in yet.
    pub bootstrap_director: Option<BootstrapDirector>,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct BootstrapDirector {
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `ATTACHMENTS_DIR`             | `storage/attachments`   |
    /// | `MAX_UPLOAD_BYTES`            | `10485760` (10 MiB)     |
    /// | `BOOTSTRAP_DIRECTOR_EMAIL`    | unset                   |
    /// | `BOOTSTRAP_DIRECTOR_PASSWORD` | unset                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let attachments_dir = PathBuf::from(
            std::env::var("ATTACHMENTS_DIR").unwrap_or_else(|_| "storage/attachments".into()),
        );

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let bootstrap_director = match (
            std::env::var("BOOTSTRAP_DIRECTOR_EMAIL"),
            std::env::var("BOOTSTRAP_DIRECTOR_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapDirector { email, password })
            }
            _ => None,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            attachments_dir,
            max_upload_bytes,
            bootstrap_director,
            jwt,
        }
    }
}
