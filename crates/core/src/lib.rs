//! Domain logic for guard duties, schedules and outing substitutions.
//!
//! This crate has no internal dependencies so it can be shared by the
//! repository layer, the HTTP API and any future tooling.

pub mod communication;
pub mod csv_import;
pub mod error;
pub mod guard;
pub mod outing;
pub mod ranking;
pub mod roles;
pub mod schedule;
pub mod task;
pub mod types;
pub mod validation;
