//! Guard duties, manual assignment, auto-assignment and candidate lists.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth};
use guardies_db::models::professor::Professor;
use serde_json::{json, Value};
use sqlx::PgPool;

/// 2025-03-10 is a Monday.
const MONDAY: &str = "2025-03-10";

async fn create_guard(pool: &PgPool, token: &str, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/guardies", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn monday_guard(pool: &PgPool, token: &str, start: &str, end: &str) -> i64 {
    let guard = create_guard(
        pool,
        token,
        json!({
            "date": MONDAY,
            "start_time": start,
            "end_time": end,
            "guard_type": "pati",
            "location": "Pati nord"
        }),
    )
    .await;
    guard["id"].as_i64().unwrap()
}

async fn add_timetable_hour(pool: &PgPool, token: &str, professor: &Professor, code: &str) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/horaris",
        token,
        json!({
            "professor_id": professor.id,
            "weekday": 1,
            "start_time": "10:00:00",
            "end_time": "11:00:00",
            "subject_code": code
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn assign(pool: &PgPool, token: &str, guard_id: i64, professor_id: i64) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/assignacions-guardia",
        token,
        json!({ "guardia_id": guard_id, "professor_id": professor_id }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Guard CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_guard_is_pending(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let guard = create_guard(
        &pool,
        &token,
        json!({
            "date": MONDAY,
            "start_time": "11:30:00",
            "end_time": "12:00:00",
            "guard_type": "biblioteca"
        }),
    )
    .await;

    assert_eq!(guard["status_id"], 1);
    assert_eq!(guard["guard_type"], "biblioteca");
    assert!(guard["outing_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn guard_validation(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;

    let bad_type = json!({
        "date": MONDAY, "start_time": "10:00:00", "end_time": "11:00:00", "guard_type": "cuina"
    });
    let backwards = json!({
        "date": MONDAY, "start_time": "11:00:00", "end_time": "10:00:00", "guard_type": "pati"
    });
    for body in [bad_type, backwards] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/guardies", &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_date_and_status(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    monday_guard(&pool, &token, "10:00:00", "11:00:00").await;
    create_guard(
        &pool,
        &token,
        json!({
            "date": "2025-03-11", "start_time": "10:00:00", "end_time": "11:00:00", "guard_type": "aula"
        }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/guardies?from={MONDAY}&to={MONDAY}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/guardies?status=1", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/guardies?from=2025-03-11&to=2025-03-10", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_guard_cannot_be_completed(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let guard_id = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/guardies/{guard_id}"),
        &token,
        json!({ "status_id": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Assigning goes through the assignments endpoint.
    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/guardies/{guard_id}"),
        &token,
        json!({ "status_id": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Manual assignment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn assign_then_complete(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let professor = common::create_professor(&pool, "guardia@institut.cat", "professor").await;
    let guard_id = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;

    let response = assign(&pool, &token, guard_id, professor.id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let assignment = body_json(response).await["data"].clone();
    assert_eq!(assignment["reason"], "equilibri");
    assert_eq!(assignment["status_id"], 1);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/guardies/{guard_id}"), &token).await;
    assert_eq!(body_json(response).await["data"]["status_id"], 2);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/guardies/{guard_id}"),
        &token,
        json!({ "status_id": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status_id"], 3);

    // Completed assignments are frozen.
    let other = common::create_professor(&pool, "altre@institut.cat", "professor").await;
    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/assignacions-guardia/{}", assignment["id"]),
        &token,
        json!({ "professor_id": other.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn guard_cannot_be_assigned_twice(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let first = common::create_professor(&pool, "primer@institut.cat", "professor").await;
    let second = common::create_professor(&pool, "segon@institut.cat", "professor").await;
    let guard_id = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;

    assert_eq!(assign(&pool, &token, guard_id, first.id).await.status(), StatusCode::CREATED);
    assert_eq!(assign(&pool, &token, guard_id, second.id).await.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn busy_professor_cannot_take_overlapping_guard(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let professor = common::create_professor(&pool, "ocupat@institut.cat", "professor").await;
    let first = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;
    let overlapping = monday_guard(&pool, &token, "10:30:00", "11:30:00").await;
    let back_to_back = monday_guard(&pool, &token, "11:00:00", "12:00:00").await;

    assert_eq!(assign(&pool, &token, first, professor.id).await.status(), StatusCode::CREATED);
    assert_eq!(
        assign(&pool, &token, overlapping, professor.id).await.status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        assign(&pool, &token, back_to_back, professor.id).await.status(),
        StatusCode::CREATED
    );
}

async fn put_guard(pool: &PgPool, token: &str, guard_id: i64, body: Value) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    put_json_auth(app, &format!("/api/guardies/{guard_id}"), token, body)
        .await
        .status()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn moving_assigned_guard_rechecks_its_professor(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let professor = common::create_professor(&pool, "mogut@institut.cat", "professor").await;
    let morning = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;
    let noon = monday_guard(&pool, &token, "12:00:00", "13:00:00").await;
    let unassigned = monday_guard(&pool, &token, "12:00:00", "13:00:00").await;
    assert_eq!(assign(&pool, &token, morning, professor.id).await.status(), StatusCode::CREATED);
    assert_eq!(assign(&pool, &token, noon, professor.id).await.status(), StatusCode::CREATED);

    let onto_morning = json!({ "start_time": "10:00:00", "end_time": "11:00:00" });
    assert_eq!(put_guard(&pool, &token, noon, onto_morning.clone()).await, StatusCode::CONFLICT);
    assert_eq!(
        put_guard(&pool, &token, noon, json!({ "absent_professor_id": professor.id })).await,
        StatusCode::BAD_REQUEST
    );

    // Nothing was saved by the refused updates.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/guardies/{noon}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["start_time"], "12:00:00");
    assert!(json["data"]["absent_professor_id"].is_null());

    // Its own slot never clashes, and back-to-back is fine.
    assert_eq!(
        put_guard(&pool, &token, noon, json!({ "start_time": "11:00:00", "end_time": "12:00:00" })).await,
        StatusCode::OK
    );
    assert_eq!(
        put_guard(&pool, &token, morning, json!({ "end_time": "10:30:00" })).await,
        StatusCode::OK
    );
    // Pending guards carry nobody to re-check.
    assert_eq!(put_guard(&pool, &token, unassigned, onto_morning).await, StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completing_keeps_field_changes_with_status(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let professor = common::create_professor(&pool, "acaba@institut.cat", "professor").await;
    let guard_id = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;
    assert_eq!(assign(&pool, &token, guard_id, professor.id).await.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/guardies/{guard_id}"),
        &token,
        json!({ "status_id": 3, "notes": "Sense incidències" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status_id"], 3);
    assert_eq!(json["data"]["notes"], "Sense incidències");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn absent_professor_cannot_cover_own_class(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let absent = common::create_professor(&pool, "absent@institut.cat", "professor").await;
    let guard = create_guard(
        &pool,
        &token,
        json!({
            "date": MONDAY,
            "start_time": "09:00:00",
            "end_time": "10:00:00",
            "guard_type": "substitucio",
            "absent_professor_id": absent.id
        }),
    )
    .await;
    let guard_id = guard["id"].as_i64().unwrap();

    let response = assign(&pool, &token, guard_id, absent.id).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = assign(&pool, &token, guard_id, 9_999).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reassign_active_assignment(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let first = common::create_professor(&pool, "abans@institut.cat", "professor").await;
    let second = common::create_professor(&pool, "despres@institut.cat", "professor").await;
    let guard_id = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;

    let assignment = body_json(assign(&pool, &token, guard_id, first.id).await).await["data"].clone();

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/assignacions-guardia/{}", assignment["id"]),
        &token,
        json!({ "professor_id": second.id, "reason": "carrec" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["professor_id"], second.id);
    assert_eq!(json["data"]["reason"], "carrec");

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/assignacions-guardia?professor_id={}", second.id),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Ranking and auto-assignment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn available_list_prefers_guard_hours(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let on_guard = common::create_professor(&pool, "hora.g@institut.cat", "professor").await;
    let teaching = common::create_professor(&pool, "classe@institut.cat", "professor").await;
    add_timetable_hour(&pool, &token, &on_guard, "G").await;
    add_timetable_hour(&pool, &token, &teaching, "MAT").await;
    let guard_id = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/professors/available/{guard_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let list = json["data"].as_array().unwrap();

    assert_eq!(list[0]["professor_id"], on_guard.id);
    assert_eq!(list[0]["tier"], 1);
    assert_eq!(list[0]["status"], "on_guard");
    assert_eq!(list[1]["professor_id"], teaching.id);
    assert_eq!(list[1]["tier"], 2);
    assert!(list[2..].iter().all(|c| c["tier"] == 3));
    assert!(list[0]["name"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_assign_picks_the_guard_hour(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let on_guard = common::create_professor(&pool, "torn@institut.cat", "professor").await;
    add_timetable_hour(&pool, &token, &on_guard, "G").await;
    let guard_id = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/assignacions-guardia/auto-assign",
        &token,
        json!({ "guardia_id": guard_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let assigned = json["data"]["assigned"].as_array().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["professor_id"], on_guard.id);
    assert!(json["data"]["unassigned"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_assign_spreads_the_load(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    common::create_professor(&pool, "a@institut.cat", "professor").await;
    common::create_professor(&pool, "b@institut.cat", "professor").await;
    for (start, end) in [("08:00:00", "09:00:00"), ("09:00:00", "10:00:00"), ("12:00:00", "13:00:00")] {
        monday_guard(&pool, &token, start, end).await;
    }

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/assignacions-guardia/auto-assign",
        &token,
        json!({ "date": MONDAY }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let mut professors: Vec<i64> = json["data"]["assigned"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["professor_id"].as_i64().unwrap())
        .collect();
    professors.sort_unstable();
    professors.dedup();
    // Three free professors (director included), three guards: one each.
    assert_eq!(professors.len(), 3);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/guardies?status=1", &token).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_assign_reports_guards_nobody_can_take(pool: PgPool) {
    let (director, token) = common::manager_token(&pool).await;
    let first = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;
    let second = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/assignacions-guardia/auto-assign",
        &token,
        json!({}),
    )
    .await;
    let json = body_json(response).await;
    let assigned = json["data"]["assigned"].as_array().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["professor_id"], director.id);
    assert_eq!(assigned[0]["guard_id"], first);
    assert_eq!(json["data"]["unassigned"], json!([second]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_assign_rejects_assigned_guard(pool: PgPool) {
    let (director, token) = common::manager_token(&pool).await;
    let guard_id = monday_guard(&pool, &token, "10:00:00", "11:00:00").await;
    assert_eq!(assign(&pool, &token, guard_id, director.id).await.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/assignacions-guardia/auto-assign",
        &token,
        json!({ "guardia_id": guard_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
