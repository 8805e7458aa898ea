//! Route definitions for reference data: academic years, groups,
//! classrooms, subjects and students. All share the same CRUD shape.

use axum::routing::get;
use axum::Router;

use crate::handlers::{academic_year, classroom, group, student, subject};
use crate::state::AppState;

/// Routes mounted at `/cursos-academics`.
pub fn academic_years() -> Router<AppState> {
    Router::new()
        .route("/", get(academic_year::list).post(academic_year::create))
        .route(
            "/{id}",
            get(academic_year::get_by_id)
                .put(academic_year::update)
                .delete(academic_year::delete),
        )
}

/// Routes mounted at `/grups`.
pub fn groups() -> Router<AppState> {
    Router::new()
        .route("/", get(group::list).post(group::create))
        .route(
            "/{id}",
            get(group::get_by_id).put(group::update).delete(group::delete),
        )
}

/// Routes mounted at `/aules`.
pub fn classrooms() -> Router<AppState> {
    Router::new()
        .route("/", get(classroom::list).post(classroom::create))
        .route(
            "/{id}",
            get(classroom::get_by_id)
                .put(classroom::update)
                .delete(classroom::delete),
        )
}

/// Routes mounted at `/materies`.
pub fn subjects() -> Router<AppState> {
    Router::new()
        .route("/", get(subject::list).post(subject::create))
        .route(
            "/{id}",
            get(subject::get_by_id)
                .put(subject::update)
                .delete(subject::delete),
        )
}

/// Routes mounted at `/alumnes`.
pub fn students() -> Router<AppState> {
    Router::new()
        .route("/", get(student::list).post(student::create))
        .route(
            "/{id}",
            get(student::get_by_id)
                .put(student::update)
                .delete(student::delete),
        )
}
