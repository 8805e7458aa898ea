//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Guard duty lifecycle (`guard_statuses`).
    GuardStatus {
        Pending = 1,
        Assigned = 2,
        Completed = 3,
    }
}

define_status_enum! {
    /// Guard assignment lifecycle (`assignment_statuses`).
    AssignmentStatus {
        Active = 1,
        Completed = 2,
    }
}

define_status_enum! {
    /// Task lifecycle (`task_statuses`).
    TaskStatus {
        Pending = 1,
        InProgress = 2,
        Done = 3,
    }
}
