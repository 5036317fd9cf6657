pub mod sqlite_course_repository;
pub mod sqlite_course_task_repository;
pub mod sqlite_student_repository;
pub mod sqlite_task_interview_repository;
pub mod sqlite_team_distribution_repository;
pub mod sqlite_team_repository;
pub mod sqlite_user_repository;

pub use sqlite_course_repository::SqliteCourseRepository;
pub use sqlite_course_task_repository::SqliteCourseTaskRepository;
pub use sqlite_student_repository::SqliteStudentRepository;
pub use sqlite_task_interview_repository::SqliteTaskInterviewStudentRepository;
pub use sqlite_team_distribution_repository::SqliteTeamDistributionRepository;
pub use sqlite_team_repository::SqliteTeamRepository;
pub use sqlite_user_repository::SqliteUserRepository;
