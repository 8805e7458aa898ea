//! Outings and the class substitutions they require.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth};
use guardies_db::models::professor::Professor;
use serde_json::{json, Value};
use sqlx::PgPool;

/// Monday 2025-03-10 and Tuesday 2025-03-11.
const MONDAY: &str = "2025-03-10";
const TUESDAY: &str = "2025-03-11";

async fn add_class(
    pool: &PgPool,
    token: &str,
    professor: &Professor,
    weekday: i16,
    code: &str,
    group: Option<&str>,
) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/horaris",
        token,
        json!({
            "professor_id": professor.id,
            "weekday": weekday,
            "start_time": "09:00:00",
            "end_time": "10:00:00",
            "subject_code": code,
            "group_name": group,
            "room": "A12"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_outing(pool: &PgPool, token: &str, body: Value) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json_auth(app, "/api/sortides", token, body).await
}

struct Scenario {
    token: String,
    absent: Professor,
    on_guard: Professor,
    free: Professor,
    monday_class: i64,
    tuesday_class: i64,
    outing_id: i64,
}

/// `absent` teaches Monday and Tuesday at 9 and leaves on a two-day outing.
/// `on_guard` holds a guard hour on Monday at 9. `free` has no timetable.
async fn scenario(pool: &PgPool) -> Scenario {
    let (_, token) = common::manager_token(pool).await;
    let absent = common::create_professor(pool, "excursio@institut.cat", "professor").await;
    let on_guard = common::create_professor(pool, "hora.g@institut.cat", "professor").await;
    let free = common::create_professor(pool, "lliure@institut.cat", "professor").await;

    let monday_class = add_class(pool, &token, &absent, 1, "MAT", Some("1r ESO A")).await;
    let tuesday_class = add_class(pool, &token, &absent, 2, "FIS", None).await;
    add_class(pool, &token, &absent, 3, "MAT", None).await;
    add_class(pool, &token, &on_guard, 1, "G", None).await;

    let response = create_outing(
        pool,
        &token,
        json!({
            "name": "Colònies",
            "start_date": MONDAY,
            "end_date": TUESDAY,
            "location": "Berga",
            "responsible_professor_id": absent.id
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let outing = body_json(response).await["data"].clone();
    assert_eq!(outing["professor_ids"], json!([absent.id]));

    Scenario {
        token,
        outing_id: outing["id"].as_i64().unwrap(),
        absent,
        on_guard,
        free,
        monday_class,
        tuesday_class,
    }
}

// ---------------------------------------------------------------------------
// Outing CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn outing_window_is_validated(pool: PgPool) {
    let (director, token) = common::manager_token(&pool).await;

    let backwards = json!({
        "name": "Museu", "start_date": TUESDAY, "end_date": MONDAY,
        "responsible_professor_id": director.id
    });
    let half_hours = json!({
        "name": "Museu", "start_date": MONDAY, "end_date": MONDAY, "start_time": "09:00:00",
        "responsible_professor_id": director.id
    });
    let too_long = json!({
        "name": "Intercanvi", "start_date": "2025-03-01", "end_date": "2025-04-15",
        "responsible_professor_id": director.id
    });
    for body in [backwards, half_hours, too_long] {
        let response = create_outing(&pool, &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_accompanying_professors(pool: PgPool) {
    let s = scenario(&pool).await;

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/sortides/{}", s.outing_id),
        &s.token,
        json!({ "professor_ids": [s.free.id], "start_time": "09:00:00", "end_time": "12:00:00" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let mut ids: Vec<i64> = json["data"]["professor_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![s.absent.id, s.free.id]);
    assert_eq!(json["data"]["start_time"], "09:00:00");
}

// ---------------------------------------------------------------------------
// Classes to substitute
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn lists_classes_left_uncovered(pool: PgPool) {
    let s = scenario(&pool).await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/sortides/{}/classes-substituir", s.outing_id),
        &s.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let classes = json["data"].as_array().unwrap();

    // Wednesday's class is outside the outing.
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0]["schedule_id"], s.monday_class);
    assert_eq!(classes[0]["date"], MONDAY);
    assert_eq!(classes[0]["group_name"], "1r ESO A");
    assert_eq!(classes[0]["room"], "A12");
    assert!(classes[0]["substitution"].is_null());
    assert_eq!(classes[1]["schedule_id"], s.tuesday_class);

    let monday_candidates = classes[0]["candidates"].as_array().unwrap();
    assert_eq!(monday_candidates[0]["professor_id"], s.on_guard.id);
    assert!(monday_candidates
        .iter()
        .all(|c| c["professor_id"] != s.absent.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn professor_on_outing_is_not_available_for_guards(pool: PgPool) {
    let s = scenario(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/guardies",
        &s.token,
        json!({ "date": MONDAY, "start_time": "12:00:00", "end_time": "13:00:00", "guard_type": "pati" }),
    )
    .await;
    let guard_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/professors/available/{guard_id}"), &s.token).await;
    let json = body_json(response).await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["professor_id"] != s.absent.id));
}

// ---------------------------------------------------------------------------
// Proposals and confirmation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn proposals_must_match_uncovered_classes(pool: PgPool) {
    let s = scenario(&pool).await;
    let uri = format!("/api/sortides/{}/substitucions", s.outing_id);

    let wrong_date = json!([{
        "schedule_id": s.monday_class, "date": TUESDAY, "substitute_professor_id": s.free.id
    }]);
    let self_cover = json!([{
        "schedule_id": s.monday_class, "date": MONDAY, "substitute_professor_id": s.absent.id
    }]);
    for body in [wrong_date, self_cover] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, &uri, &s.token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn propose_and_confirm_substitutions(pool: PgPool) {
    let s = scenario(&pool).await;
    let uri = format!("/api/sortides/{}/substitucions", s.outing_id);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &uri,
        &s.token,
        json!([
            { "schedule_id": s.monday_class, "date": MONDAY, "substitute_professor_id": s.on_guard.id },
            { "schedule_id": s.tuesday_class, "date": TUESDAY, "substitute_professor_id": s.free.id,
              "notes": "Exercicis del tema 4" }
        ]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let proposed = body_json(response).await;
    assert_eq!(proposed["data"].as_array().unwrap().len(), 2);
    assert!(proposed["data"][0]["confirmed_at"].is_null());
    assert_eq!(proposed["data"][0]["absent_professor_id"], s.absent.id);

    // Re-proposing the same class updates it instead of adding a row.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &uri,
        &s.token,
        json!([{ "schedule_id": s.tuesday_class, "date": TUESDAY, "substitute_professor_id": s.on_guard.id }]),
    )
    .await;
    let proposed = body_json(response).await;
    assert_eq!(proposed["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/sortides/{}/confirmar-substitucions", s.outing_id),
        &s.token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let confirmed = body_json(response).await;
    let confirmed = confirmed["data"].as_array().unwrap();
    assert_eq!(confirmed.len(), 2);
    assert!(confirmed.iter().all(|c| c["guard_id"].is_i64()));
    assert!(confirmed.iter().all(|c| c["confirmed_at"].is_string()));

    // Each confirmed cover became an assigned substitution guard.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/guardies", &s.token).await;
    let json = body_json(response).await;
    let guards = json["data"].as_array().unwrap();
    assert_eq!(guards.len(), 2);
    for guard in guards {
        assert_eq!(guard["guard_type"], "substitucio");
        assert_eq!(guard["status_id"], 2);
        assert_eq!(guard["outing_id"], s.outing_id);
        assert_eq!(guard["absent_professor_id"], s.absent.id);
    }

    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        &format!("/api/assignacions-guardia?professor_id={}", s.on_guard.id),
        &s.token,
    )
    .await;
    let json = body_json(response).await;
    let assignments = json["data"].as_array().unwrap();
    assert_eq!(assignments.len(), 2);
    assert!(assignments.iter().all(|a| a["reason"] == "sortida"));

    // A second confirmation has nothing left to do.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/sortides/{}/confirmar-substitucions", s.outing_id),
        &s.token,
        json!({}),
    )
    .await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/sortides/{}", s.outing_id), &s.token).await;
    assert!(body_json(response).await["data"]["substitutions_confirmed_at"].is_string());
}

async fn propose(pool: &PgPool, s: &Scenario, body: Value) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    post_json_auth(app, &format!("/api/sortides/{}/substitucions", s.outing_id), &s.token, body)
        .await
        .status()
}

/// A yard guard on Monday 9:30-10:30, overlapping the absent professor's class.
async fn overlapping_guard(pool: &PgPool, s: &Scenario) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/guardies",
        &s.token,
        json!({ "date": MONDAY, "start_time": "09:30:00", "end_time": "10:30:00", "guard_type": "pati" }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn assign(pool: &PgPool, s: &Scenario, guard_id: i64, professor_id: i64) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        "/api/assignacions-guardia",
        &s.token,
        json!({ "guardia_id": guard_id, "professor_id": professor_id }),
    )
    .await
    .status()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn substitute_cannot_cover_two_classes_at_once(pool: PgPool) {
    let s = scenario(&pool).await;
    let colleague = common::create_professor(&pool, "company@institut.cat", "professor").await;
    let colleague_class = add_class(&pool, &s.token, &colleague, 1, "CAT", None).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/sortides/{}", s.outing_id),
        &s.token,
        json!({ "professor_ids": [colleague.id] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Same batch: both Monday 9-10 classes to the same substitute.
    let both = json!([
        { "schedule_id": s.monday_class, "date": MONDAY, "substitute_professor_id": s.free.id },
        { "schedule_id": colleague_class, "date": MONDAY, "substitute_professor_id": s.free.id }
    ]);
    assert_eq!(propose(&pool, &s, both).await, StatusCode::CONFLICT);

    // Across calls: the first proposal is kept, the second clashes with it.
    let first = json!([
        { "schedule_id": s.monday_class, "date": MONDAY, "substitute_professor_id": s.free.id }
    ]);
    assert_eq!(propose(&pool, &s, first.clone()).await, StatusCode::OK);
    let second = json!([
        { "schedule_id": colleague_class, "date": MONDAY, "substitute_professor_id": s.free.id }
    ]);
    assert_eq!(propose(&pool, &s, second).await, StatusCode::CONFLICT);

    // Re-proposing the same class to the same substitute is not a clash.
    assert_eq!(propose(&pool, &s, first).await, StatusCode::OK);
    let other = json!([
        { "schedule_id": colleague_class, "date": MONDAY, "substitute_professor_id": s.on_guard.id }
    ]);
    assert_eq!(propose(&pool, &s, other).await, StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn substitute_already_on_guard_is_refused(pool: PgPool) {
    let s = scenario(&pool).await;
    let guard_id = overlapping_guard(&pool, &s).await;
    assert_eq!(assign(&pool, &s, guard_id, s.on_guard.id).await, StatusCode::CREATED);

    let body = json!([
        { "schedule_id": s.monday_class, "date": MONDAY, "substitute_professor_id": s.on_guard.id }
    ]);
    assert_eq!(propose(&pool, &s, body).await, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn confirmation_rechecks_substitutes(pool: PgPool) {
    let s = scenario(&pool).await;
    let body = json!([
        { "schedule_id": s.monday_class, "date": MONDAY, "substitute_professor_id": s.free.id },
        { "schedule_id": s.tuesday_class, "date": TUESDAY, "substitute_professor_id": s.free.id }
    ]);
    assert_eq!(propose(&pool, &s, body).await, StatusCode::OK);

    // The substitute takes an overlapping guard after being proposed.
    let guard_id = overlapping_guard(&pool, &s).await;
    assert_eq!(assign(&pool, &s, guard_id, s.free.id).await, StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/sortides/{}/confirmar-substitucions", s.outing_id),
        &s.token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Nothing was confirmed, not even the Tuesday class.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/sortides/{}/substitucions", s.outing_id), &s.token).await;
    let json = body_json(response).await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|sub| sub["confirmed_at"].is_null()));

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/guardies", &s.token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_outing_is_404(pool: PgPool) {
    let (_, token) = common::manager_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/sortides/424242/classes-substituir", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
