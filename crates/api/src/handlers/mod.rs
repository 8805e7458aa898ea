//! Request handlers.
//!
//! Each submodule serves one resource. Handlers validate input with the
//! rules in `guardies_core`, delegate persistence to the repositories in
//! `guardies_db` and map errors via [`AppError`](crate::error::AppError).

pub mod academic_year;
pub mod assignment;
pub mod auth;
pub mod classroom;
pub mod communication;
pub mod group;
pub mod guard;
pub mod import;
pub mod outing;
pub mod professor;
pub mod schedule;
pub mod student;
pub mod subject;
pub mod task;
pub mod task_attachment;
