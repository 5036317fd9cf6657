use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use course_domain::{is_task_needed_to_finish, is_task_needed_to_start, CourseTask};
use serde::Serialize;

use crate::{error::ApiResult, extract::ApiPath, response::success, routes::AppState};

#[derive(Debug, Serialize)]
pub struct CourseTaskDto {
    #[serde(flatten)]
    pub task: CourseTask,
    pub needs_to_start: bool,
    pub needs_to_finish: bool,
}

/// Course tasks with their cross-check state as of now.
pub async fn list_course_tasks(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let tasks: Vec<CourseTaskDto> = state
        .course_tasks
        .find_by_course(course_id)
        .await?
        .into_iter()
        .map(|task| CourseTaskDto {
            needs_to_start: is_task_needed_to_start(&task, now),
            needs_to_finish: is_task_needed_to_finish(&task, now),
            task,
        })
        .collect();
    Ok(success(tasks))
}
