use axum::{extract::State, response::IntoResponse};
use course_domain::CourseError;
use tracing::info;

use crate::{
    auth::{
        guards::{require_roles, require_student, STAFF_OR_ADMIN, STUDENT},
        CurrentSession,
    },
    error::ApiResult,
    extract::ApiPath,
    response::{created, success},
    routes::AppState,
};

async fn ensure_course_task(state: &AppState, course_id: i64, course_task_id: i64) -> ApiResult<()> {
    state
        .course_tasks
        .find_by_id(course_task_id)
        .await?
        .filter(|task| task.course_id == course_id)
        .ok_or(CourseError::CourseTaskNotFound { id: course_task_id })?;
    Ok(())
}

/// Registers the calling student for the interview of a task.
pub async fn register_for_interview(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, course_task_id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, STUDENT)?;
    let student_id = require_student(&session, course_id)?;
    ensure_course_task(&state, course_id, course_task_id).await?;

    let registration = state
        .interviews
        .create(student_id, Some(course_id), course_task_id)
        .await?;
    info!(student_id, course_task_id, "student registered for interview");
    Ok(created(registration))
}

pub async fn list_interview_students(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, course_task_id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, STAFF_OR_ADMIN)?;
    ensure_course_task(&state, course_id, course_task_id).await?;

    let registrations = state
        .interviews
        .find_by_course_task(course_id, course_task_id)
        .await?;
    Ok(success(registrations))
}
