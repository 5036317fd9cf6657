use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use course_domain::session::{is_admin, is_course_manager};
use course_domain::{CourseRole, RequiredRole, Session};
use std::collections::HashMap;
use tracing::debug;

use crate::{
    auth::CurrentSession,
    error::{ApiError, ApiResult},
    extract::ApiPath,
    routes::AppState,
};

pub const MANAGER_OR_ADMIN: &[RequiredRole] = &[
    RequiredRole::Course(CourseRole::Manager),
    RequiredRole::Admin,
];

pub const STUDENT: &[RequiredRole] = &[RequiredRole::Course(CourseRole::Student)];

pub const STUDENT_MANAGER_OR_ADMIN: &[RequiredRole] = &[
    RequiredRole::Course(CourseRole::Student),
    RequiredRole::Course(CourseRole::Manager),
    RequiredRole::Admin,
];

pub const STAFF_OR_ADMIN: &[RequiredRole] = &[
    RequiredRole::Course(CourseRole::Manager),
    RequiredRole::Course(CourseRole::Mentor),
    RequiredRole::Admin,
];

/// Only admins and members of the course in the path get through.
pub async fn course_guard(
    ApiPath(params): ApiPath<HashMap<String, String>>,
    CurrentSession(session): CurrentSession,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let course_id = params
        .get("course_id")
        .ok_or_else(|| ApiError::BadRequest("missing course id".to_string()))?
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest("course id must be a number".to_string()))?;

    if !session.is_course_member(course_id) {
        debug!(user_id = session.user_id, course_id, "course guard rejected request");
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}

pub fn require_roles(session: &Session, course_id: i64, required: &[RequiredRole]) -> ApiResult<()> {
    if session.satisfies(course_id, required) {
        Ok(())
    } else {
        debug!(user_id = session.user_id, course_id, ?required, "role guard rejected request");
        Err(ApiError::Forbidden)
    }
}

/// The caller's student record in the course; absent for non-students.
pub fn require_student(session: &Session, course_id: i64) -> ApiResult<i64> {
    session
        .student_id(course_id)
        .ok_or(ApiError::Forbidden)
}

/// Admins and course managers pass; students must be registered in the
/// distribution.
pub async fn require_registered_student_or_manager(
    state: &AppState,
    session: &Session,
    course_id: i64,
    team_distribution_id: i64,
) -> ApiResult<()> {
    if is_admin(session) || is_course_manager(session, course_id) {
        return Ok(());
    }
    let Some(student_id) = session.student_id(course_id) else {
        return Err(ApiError::Forbidden);
    };
    if state
        .team_distributions
        .is_student_registered(team_distribution_id, student_id)
        .await?
    {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
