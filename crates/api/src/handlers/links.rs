use axum::{extract::State, response::IntoResponse};
use course_domain::{get_course_links, get_navigation_items, Course, CourseError};

use crate::{
    auth::CurrentSession, error::ApiResult, extract::ApiPath, response::success, routes::AppState,
};

async fn load_course(state: &AppState, course_id: i64) -> ApiResult<Course> {
    Ok(state
        .courses
        .find_by_id(course_id)
        .await?
        .ok_or(CourseError::CourseNotFound { id: course_id })?)
}

/// Course links visible to the caller.
pub async fn get_links(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath(course_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let course = load_course(&state, course_id).await?;
    Ok(success(get_course_links(&session, Some(&course))))
}

pub async fn get_navigation(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath(course_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let course = load_course(&state, course_id).await?;
    Ok(success(get_navigation_items(&session, Some(&course))))
}
