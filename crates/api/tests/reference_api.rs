//! Reference data: academic years, groups, classrooms, subjects, students
//! and the weekly timetable.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(pool: &PgPool, token: &str, uri: &str, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, uri, token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Academic years
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_one_current_academic_year(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let old = create(
        &pool,
        &token,
        "/api/cursos-academics",
        json!({ "name": "2023-2024", "start_date": "2023-09-01", "end_date": "2024-06-30", "is_current": true }),
    )
    .await;
    create(
        &pool,
        &token,
        "/api/cursos-academics",
        json!({ "name": "2024-2025", "start_date": "2024-09-01", "end_date": "2025-06-30", "is_current": true }),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/cursos-academics/{}", old["id"]), &token).await;
    assert_eq!(body_json(response).await["data"]["is_current"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn academic_year_dates_are_checked(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/cursos-academics",
        &token,
        json!({ "name": "Al revés", "start_date": "2025-06-30", "end_date": "2024-09-01" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Groups, classrooms, subjects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn group_crud_and_duplicate_name(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let group = create(&pool, &token, "/api/grups", json!({ "name": "1r ESO A", "level": "ESO" })).await;
    let uri = format!("/api/grups/{}", group["id"]);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/grups", &token, json!({ "name": "1r ESO A" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, &token, json!({ "level": "1r ESO" })).await;
    assert_eq!(body_json(response).await["data"]["level"], "1r ESO");

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    assert_eq!(get_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn classroom_capacity_cannot_be_negative(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    create(&pool, &token, "/api/aules", json!({ "name": "A12", "capacity": 30 })).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/aules",
        &token,
        json!({ "name": "A13", "capacity": -1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn guard_code_is_reserved(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    create(&pool, &token, "/api/materies", json!({ "code": "MAT", "name": "Matemàtiques" })).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/materies", &token, json!({ "code": "g", "name": "Guàrdia" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/materies", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reference_writes_need_a_manager(pool: PgPool) {
    let professor = common::create_professor(&pool, "prof@institut.cat", "professor").await;
    let token = common::token_for(&professor);

    for (uri, body) in [
        ("/api/grups", json!({ "name": "2n ESO B" })),
        ("/api/aules", json!({ "name": "B1" })),
        ("/api/materies", json!({ "code": "HIS", "name": "Història" })),
        ("/api/alumnes", json!({ "name": "Pol", "surname": "Serra" })),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, uri, &token, body).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "POST {uri}");
    }

    let app = common::build_test_app(pool);
    assert_eq!(get_auth(app, "/api/grups", &token).await.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn students_filtered_by_group(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let group = create(&pool, &token, "/api/grups", json!({ "name": "3r ESO C" })).await;
    create(
        &pool,
        &token,
        "/api/alumnes",
        json!({ "name": "Pol", "surname": "Serra", "group_id": group["id"] }),
    )
    .await;
    create(&pool, &token, "/api/alumnes", json!({ "name": "Júlia", "surname": "Mas" })).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/alumnes?group_id={}", group["id"]), &token).await;
    let json = body_json(response).await;
    let students = json["data"].as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["name"], "Pol");

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/alumnes",
        &token,
        json!({ "name": "Martí", "surname": "Pla", "email": "no-valid" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Timetable
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn timetable_rows_are_validated(pool: PgPool) {
    let (director, token) = common::manager_token(&pool).await;
    let row = json!({
        "professor_id": director.id,
        "weekday": 2,
        "start_time": "08:00:00",
        "end_time": "09:00:00",
        "subject_code": "MAT"
    });
    create(&pool, &token, "/api/horaris", row.clone()).await;

    // Same professor, weekday and start time.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/horaris", &token, row).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let saturday = json!({
        "professor_id": director.id, "weekday": 6,
        "start_time": "08:00:00", "end_time": "09:00:00", "subject_code": "MAT"
    });
    let backwards = json!({
        "professor_id": director.id, "weekday": 3,
        "start_time": "09:00:00", "end_time": "08:00:00", "subject_code": "MAT"
    });
    for body in [saturday, backwards] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/horaris", &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/horaris?weekday=2", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/horaris?weekday=0", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
