//! Guard assignment engine.
//!
//! Bridges the pure ranking functions in `guardies_core::ranking` with the
//! database: loads the staff, their timetables, guard history and existing
//! commitments, then ranks candidates or applies an auto-assign plan.

pub mod candidates;
pub mod dispatcher;
