//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the professor behind a Bearer token.
//! - [`rbac::RequireAuth`] -- any logged-in professor.
//! - [`rbac::RequireManager`] -- coordinator, head of studies or director.

pub mod auth;
pub mod rbac;
