//! Data-access abstractions. Implementations live in the infrastructure crate.

use async_trait::async_trait;
use course_errors::CourseResult;

use crate::entities::{
    Course, CourseTask, CourseUser, CrossCheckStatus, Mentor, NewCourse, NewCourseTask,
    NewStudent, NewTeam, NewTeamDistribution, NewUser, Paginated, Pagination, Student,
    TaskInterviewStudent, Team, TeamDistribution, TeamWithStudents, User,
};
use crate::session::Session;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> CourseResult<User>;
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<User>>;
    /// Upserts the staff flags of a user in a course.
    async fn assign_course_roles(&self, course_user: &CourseUser) -> CourseResult<()>;
    async fn create_mentor(&self, user_id: i64, course_id: i64) -> CourseResult<Mentor>;
    /// Builds the session of a user from their student, mentor and staff records.
    async fn load_session(&self, user_id: i64) -> CourseResult<Option<Session>>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: &NewCourse) -> CourseResult<Course>;
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<Course>>;
    async fn find_all(&self) -> CourseResult<Vec<Course>>;
}

#[async_trait]
pub trait CourseTaskRepository: Send + Sync {
    async fn create(&self, task: &NewCourseTask) -> CourseResult<CourseTask>;
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<CourseTask>>;
    async fn find_by_course(&self, course_id: i64) -> CourseResult<Vec<CourseTask>>;
    /// Tasks whose cross-check is not `Completed` yet.
    async fn find_open_cross_checks(&self) -> CourseResult<Vec<CourseTask>>;
    /// Moves a task from `from` to `to`; returns false when the stored status
    /// no longer equals `from`.
    async fn transition_cross_check(
        &self,
        id: i64,
        from: CrossCheckStatus,
        to: CrossCheckStatus,
    ) -> CourseResult<bool>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, student: &NewStudent) -> CourseResult<Student>;
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<Student>>;
    async fn set_expelled(&self, id: i64, is_expelled: bool) -> CourseResult<()>;
    /// Students registered in the distribution who have no team in it, best rank first.
    async fn find_without_team(
        &self,
        team_distribution_id: i64,
        pagination: Pagination,
    ) -> CourseResult<Paginated<Student>>;
}

#[async_trait]
pub trait TeamDistributionRepository: Send + Sync {
    async fn create(&self, distribution: &NewTeamDistribution) -> CourseResult<TeamDistribution>;
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<TeamDistribution>>;
    async fn find_by_course(&self, course_id: i64) -> CourseResult<Vec<TeamDistribution>>;
    async fn update(&self, distribution: &TeamDistribution) -> CourseResult<TeamDistribution>;
    async fn delete(&self, id: i64) -> CourseResult<bool>;
    async fn register_student(&self, team_distribution_id: i64, student_id: i64) -> CourseResult<()>;
    /// Removes the registration and any team membership inside the distribution.
    async fn unregister_student(&self, team_distribution_id: i64, student_id: i64) -> CourseResult<bool>;
    async fn is_student_registered(&self, team_distribution_id: i64, student_id: i64) -> CourseResult<bool>;
    async fn registered_distribution_ids(&self, student_id: i64) -> CourseResult<Vec<i64>>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, team: &NewTeam) -> CourseResult<TeamWithStudents>;
    async fn find_with_students(&self, id: i64) -> CourseResult<Option<TeamWithStudents>>;
    async fn find_student_team(&self, team_distribution_id: i64, student_id: i64) -> CourseResult<Option<Team>>;
    /// Distribution ids in which the student already has a team.
    async fn team_distribution_ids_for_student(&self, student_id: i64) -> CourseResult<Vec<i64>>;
    async fn count_by_distribution(&self, team_distribution_id: i64) -> CourseResult<i64>;
}

#[async_trait]
pub trait TaskInterviewStudentRepository: Send + Sync {
    async fn create(
        &self,
        student_id: i64,
        course_id: Option<i64>,
        course_task_id: i64,
    ) -> CourseResult<TaskInterviewStudent>;
    async fn find(
        &self,
        student_id: i64,
        course_id: i64,
        course_task_id: i64,
    ) -> CourseResult<Option<TaskInterviewStudent>>;
    async fn find_by_course_task(&self, course_id: i64, course_task_id: i64) -> CourseResult<Vec<TaskInterviewStudent>>;
    async fn delete(&self, id: i64) -> CourseResult<bool>;
}
