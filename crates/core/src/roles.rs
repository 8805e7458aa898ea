//! Well-known professor role names.
//!
//! These must match the `ck_professors_role` constraint in
//! `20260301000002_create_professors.sql`.

pub const ROLE_PROFESSOR: &str = "professor";
pub const ROLE_COORDINATOR: &str = "coordinator";
pub const ROLE_HEAD_OF_STUDIES: &str = "head_of_studies";
pub const ROLE_DIRECTOR: &str = "director";

/// Every role accepted by the `professors.role` column.
pub const ALL_ROLES: &[&str] = &[
    ROLE_PROFESSOR,
    ROLE_COORDINATOR,
    ROLE_HEAD_OF_STUDIES,
    ROLE_DIRECTOR,
];

/// Returns `true` if `role` is one of [`ALL_ROLES`].
pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}

/// Roles allowed to manage guard duties, outings, schedules and imports.
pub fn is_manager_role(role: &str) -> bool {
    matches!(
        role,
        ROLE_COORDINATOR | ROLE_HEAD_OF_STUDIES | ROLE_DIRECTOR
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_roles_are_valid() {
        for role in ALL_ROLES {
            assert!(is_valid_role(role));
        }
        assert!(!is_valid_role("admin"));
        assert!(!is_valid_role(""));
    }

    #[test]
    fn plain_professor_is_not_a_manager() {
        assert!(!is_manager_role(ROLE_PROFESSOR));
        assert!(is_manager_role(ROLE_COORDINATOR));
        assert!(is_manager_role(ROLE_HEAD_OF_STUDIES));
        assert!(is_manager_role(ROLE_DIRECTOR));
    }
}
