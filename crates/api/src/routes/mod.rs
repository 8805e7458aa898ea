pub mod assignment;
pub mod auth;
pub mod communication;
pub mod guard;
pub mod health;
pub mod import;
pub mod outing;
pub mod professor;
pub mod reference;
pub mod schedule;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/refresh                                 refresh (public)
/// /auth/logout                                  logout
/// /auth/me                                      current professor
///
/// /professors                                   list, create
/// /professors/{id}                              get, update, delete
/// /professors/available/{guardia_id}            ranked candidates for a guard
///
/// /guardies                                     list (?from=&to=&status=), create
/// /guardies/{id}                                get, update, delete
///
/// /assignacions-guardia                         list (?guardia_id=&professor_id=), create
/// /assignacions-guardia/auto-assign             auto-assign pending guards
/// /assignacions-guardia/{id}                    get, reassign
///
/// /sortides                                     list, create
/// /sortides/{id}                                get, update, delete
/// /sortides/{id}/classes-substituir             uncovered classes + candidates
/// /sortides/{id}/substitucions                  list, propose
/// /sortides/{id}/confirmar-substitucions        confirm proposals
///
/// /horaris                                      list (?professor_id=&weekday=), create
/// /horaris/{id}                                 get, update, delete
///
/// /comunicacions                                list (?group_id=), create
/// /comunicacions/{id}                           get, update, delete
///
/// /tasques                                      list (?professor_id=&status=), create
/// /tasques/{id}                                 get, update, delete
/// /tasques/{id}/adjunts                         list, upload
/// /tasques/{id}/adjunts/{adjunt_id}             download, delete
///
/// /cursos-academics, /grups, /aules,
/// /materies, /alumnes (?group_id=)              reference data CRUD
///
/// /import/csv                                   import (?entity=)
/// /import/csv/columns                           expected headers
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/professors", professor::router())
        .nest("/guardies", guard::router())
        .nest("/assignacions-guardia", assignment::router())
        .nest("/sortides", outing::router())
        .nest("/horaris", schedule::router())
        .nest("/comunicacions", communication::router())
        .nest("/tasques", task::router())
        .nest("/cursos-academics", reference::academic_years())
        .nest("/grups", reference::groups())
        .nest("/aules", reference::classrooms())
        .nest("/materies", reference::subjects())
        .nest("/alumnes", reference::students())
        .nest("/import", import::router())
}
