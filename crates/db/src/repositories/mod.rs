//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod academic_year_repo;
pub mod assignment_repo;
pub mod classroom_repo;
pub mod communication_repo;
pub mod group_repo;
pub mod guard_repo;
pub mod outing_repo;
pub mod professor_repo;
pub mod schedule_repo;
pub mod session_repo;
pub mod student_repo;
pub mod subject_repo;
pub mod substitution_repo;
pub mod task_attachment_repo;
pub mod task_repo;

pub use academic_year_repo::AcademicYearRepo;
pub use assignment_repo::AssignmentRepo;
pub use classroom_repo::ClassroomRepo;
pub use communication_repo::CommunicationRepo;
pub use group_repo::GroupRepo;
pub use guard_repo::GuardRepo;
pub use outing_repo::OutingRepo;
pub use professor_repo::ProfessorRepo;
pub use schedule_repo::ScheduleRepo;
pub use session_repo::SessionRepo;
pub use student_repo::StudentRepo;
pub use subject_repo::SubjectRepo;
pub use substitution_repo::SubstitutionRepo;
pub use task_attachment_repo::TaskAttachmentRepo;
pub use task_repo::TaskRepo;
