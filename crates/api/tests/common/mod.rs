#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use guardies_api::auth::jwt::{generate_access_token, JwtConfig};
use guardies_api::auth::password::hash_password;
use guardies_api::config::ServerConfig;
use guardies_api::router::build_app_router;
use guardies_api::state::AppState;
use guardies_db::models::professor::{CreateProfessor, Professor};
use guardies_db::repositories::ProfessorRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "guardia_segura_123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(attachments_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        attachments_dir,
        max_upload_bytes: 1024 * 1024,
        bootstrap_director: None,
        jwt: test_jwt(),
    }
}

pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-not-for-production".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 1,
    }
}

/// The production router over `pool`. Attachments go to a per-process
/// directory under the system temp dir.
pub fn build_test_app(pool: PgPool) -> Router {
    let dir = std::env::temp_dir().join(format!("guardies-test-{}", std::process::id()));
    build_test_app_with_storage(pool, &dir)
}

pub fn build_test_app_with_storage(pool: PgPool, attachments_dir: &Path) -> Router {
    let config = test_config(attachments_dir.to_path_buf());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a professor who can log in with [`TEST_PASSWORD`].
pub async fn create_professor(pool: &PgPool, email: &str, role: &str) -> Professor {
    let hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    ProfessorRepo::create(
        pool,
        &CreateProfessor {
            name: "Prof".to_string(),
            surname: email.split('@').next().unwrap_or("x").to_string(),
            email: email.to_string(),
            role: Some(role.to_string()),
            department: None,
            password_hash: Some(hash),
        },
    )
    .await
    .expect("professor creation should succeed")
}

/// Access token for `professor` signed with the test secret.
pub fn token_for(professor: &Professor) -> String {
    generate_access_token(professor.id, &professor.role, &test_jwt())
        .expect("token generation should succeed")
}

/// A director and their token, for endpoints that need a manager.
pub async fn manager_token(pool: &PgPool) -> (Professor, String) {
    let director = create_professor(pool, "direccio@institut.cat", "director").await;
    let token = token_for(&director);
    (director, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, builder(Method::GET, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, Some(token), body).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, builder(Method::DELETE, uri, Some(token)).body(Body::empty()).unwrap()).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let request = builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
