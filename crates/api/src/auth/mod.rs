//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token signing/validation and refresh-token helpers.
//! - [`bootstrap`] -- first director account on an empty database.

pub mod bootstrap;
pub mod jwt;
pub mod password;
