//! Tasks, their lifecycle and file attachments.

mod common;

use std::path::Path;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use common::{body_bytes, body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

const BOUNDARY: &str = "guardies-test-boundary";

async fn create_task(pool: &PgPool, token: &str, title: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/tasques",
        token,
        json!({ "title": title, "due_date": "2025-03-14" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(
    pool: &PgPool,
    storage: &Path,
    token: &str,
    task_id: i64,
    body: Vec<u8>,
) -> axum::response::Response {
    let app = common::build_test_app_with_storage(pool.clone(), storage);
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/tasques/{task_id}/adjunts"))
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    common::send(app, request).await
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn any_professor_can_create_tasks(pool: PgPool) {
    let professor = common::create_professor(&pool, "tasca@institut.cat", "professor").await;
    let token = common::token_for(&professor);
    let id = create_task(&pool, &token, "Preparar l'avaluació").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/tasques/{id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status_id"], 1);
    assert_eq!(json["data"]["created_by"], professor.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_title_is_rejected(pool: PgPool) {
    let professor = common::create_professor(&pool, "tasca@institut.cat", "professor").await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/tasques",
        &common::token_for(&professor),
        json!({ "title": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_lifecycle_is_enforced(pool: PgPool) {
    let professor = common::create_professor(&pool, "cicle@institut.cat", "professor").await;
    let token = common::token_for(&professor);
    let id = create_task(&pool, &token, "Revisar inventari").await;
    let uri = format!("/api/tasques/{id}");

    for (status, expected) in [
        (2, StatusCode::OK),
        (3, StatusCode::OK),
        // Done tasks must be reopened first.
        (2, StatusCode::CONFLICT),
        (1, StatusCode::OK),
        (7, StatusCode::CONFLICT),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = put_json_auth(app, &uri, &token, json!({ "status_id": status })).await;
        assert_eq!(response.status(), expected, "moving to status {status}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_assignee(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let assignee = common::create_professor(&pool, "encarregat@institut.cat", "professor").await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/tasques",
        &token,
        json!({ "title": "Comprar material", "assigned_professor_id": assignee.id }),
    )
    .await;
    create_task(&pool, &token, "Sense responsable").await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/tasques?professor_id={}", assignee.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let tasks = json["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Comprar material");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_creator_or_manager_deletes(pool: PgPool) {
    let (_, manager) = common::manager_token(&pool).await;
    let owner = common::create_professor(&pool, "autor@institut.cat", "professor").await;
    let other = common::create_professor(&pool, "altre@institut.cat", "professor").await;
    let id = create_task(&pool, &common::token_for(&owner), "Meva").await;
    let uri = format!("/api/tasques/{id}");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &common::token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &manager).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &manager).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn attachment_round_trip(pool: PgPool) {
    let storage = tempfile::tempdir().unwrap();
    let professor = common::create_professor(&pool, "adjunt@institut.cat", "professor").await;
    let token = common::token_for(&professor);
    let task_id = create_task(&pool, &token, "Acta de claustre").await;

    let contents = b"%PDF-1.4 acta".to_vec();
    let response = upload(
        &pool,
        storage.path(),
        &token,
        task_id,
        multipart_body("file", "../../acta claustre.pdf", "application/pdf", &contents),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let attachment = body_json(response).await["data"].clone();
    assert_eq!(attachment["file_name"], "acta claustre.pdf");
    assert_eq!(attachment["content_type"], "application/pdf");
    assert_eq!(attachment["size_bytes"], contents.len());
    assert!(attachment.get("storage_path").is_none());
    let attachment_id = attachment["id"].as_i64().unwrap();

    let task_dir = storage.path().join(format!("task_{task_id}"));
    assert_eq!(std::fs::read_dir(&task_dir).unwrap().count(), 1);

    let app = common::build_test_app_with_storage(pool.clone(), storage.path());
    let response = get_auth(app, &format!("/api/tasques/{task_id}/adjunts"), &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/tasques/{task_id}/adjunts/{attachment_id}");
    let app = common::build_test_app_with_storage(pool.clone(), storage.path());
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"acta claustre.pdf\""
    );
    assert_eq!(body_bytes(response).await, contents);

    let app = common::build_test_app_with_storage(pool.clone(), storage.path());
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(std::fs::read_dir(&task_dir).unwrap().count(), 0);

    let app = common::build_test_app_with_storage(pool, storage.path());
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_needs_a_non_empty_file_field(pool: PgPool) {
    let storage = tempfile::tempdir().unwrap();
    let professor = common::create_professor(&pool, "buit@institut.cat", "professor").await;
    let token = common::token_for(&professor);
    let task_id = create_task(&pool, &token, "Buida").await;

    let empty = multipart_body("file", "buit.txt", "text/plain", b"");
    let response = upload(&pool, storage.path(), &token, task_id, empty).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let wrong_field = multipart_body("document", "nota.txt", "text/plain", b"hola");
    let response = upload(&pool, storage.path(), &token, task_id, wrong_field).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = upload(
        &pool,
        storage.path(),
        &token,
        9_999,
        multipart_body("file", "nota.txt", "text/plain", b"hola"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_upload_is_refused(pool: PgPool) {
    let storage = tempfile::tempdir().unwrap();
    let professor = common::create_professor(&pool, "gran@institut.cat", "professor").await;
    let token = common::token_for(&professor);
    let task_id = create_task(&pool, &token, "Gran").await;

    // The test config caps bodies at 1 MiB.
    let big = vec![b'x'; 2 * 1024 * 1024];
    let response = upload(
        &pool,
        storage.path(),
        &token,
        task_id,
        multipart_body("file", "gran.bin", "application/octet-stream", &big),
    )
    .await;
    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_uploader_or_manager_deletes_attachment(pool: PgPool) {
    let storage = tempfile::tempdir().unwrap();
    let (_, manager) = common::manager_token(&pool).await;
    let uploader = common::create_professor(&pool, "puja@institut.cat", "professor").await;
    let other = common::create_professor(&pool, "mira@institut.cat", "professor").await;
    let token = common::token_for(&uploader);
    let task_id = create_task(&pool, &token, "Compartida").await;

    let response = upload(
        &pool,
        storage.path(),
        &token,
        task_id,
        multipart_body("file", "llista.csv", "text/csv", b"a,b\n1,2\n"),
    )
    .await;
    let attachment_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/tasques/{task_id}/adjunts/{attachment_id}");

    let app = common::build_test_app_with_storage(pool.clone(), storage.path());
    let response = delete_auth(app, &uri, &common::token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app_with_storage(pool, storage.path());
    let response = delete_auth(app, &uri, &manager).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_task_removes_its_files(pool: PgPool) {
    let storage = tempfile::tempdir().unwrap();
    let professor = common::create_professor(&pool, "neteja@institut.cat", "professor").await;
    let token = common::token_for(&professor);
    let task_id = create_task(&pool, &token, "Temporal").await;

    let response = upload(
        &pool,
        storage.path(),
        &token,
        task_id,
        multipart_body("file", "nota.txt", "text/plain", b"hola"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task_dir = storage.path().join(format!("task_{task_id}"));
    assert!(task_dir.exists());

    let app = common::build_test_app_with_storage(pool, storage.path());
    let response = delete_auth(app, &format!("/api/tasques/{task_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!task_dir.exists());
}
