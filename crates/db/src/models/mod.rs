//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod academic_year;
pub mod assignment;
pub mod classroom;
pub mod communication;
pub mod group;
pub mod guard;
pub mod outing;
pub mod professor;
pub mod schedule;
pub mod session;
pub mod status;
pub mod student;
pub mod subject;
pub mod substitution;
pub mod task;
