use axum::{extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use course_domain::entities::{NewTeamDistribution, Pagination, TeamDistributionPatch};
use course_domain::services::CreateTeamCommand;

use crate::{
    auth::{
        guards::{
            require_registered_student_or_manager, require_roles, require_student,
            MANAGER_OR_ADMIN, STUDENT, STUDENT_MANAGER_OR_ADMIN,
        },
        CurrentSession,
    },
    error::ApiResult,
    extract::{ApiPath, ApiQuery, ValidatedJson},
    response::{created, ok_message, success, PaginatedResponse},
    routes::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamDistributionDto {
    #[validate(length(min = 1, max = 256, message = "name must be 1-256 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(url(message = "description_url must be a valid url"))]
    pub description_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(range(min = 1, message = "min_team_size must be at least 1"))]
    pub min_team_size: i32,
    #[validate(range(min = 1, message = "max_team_size must be at least 1"))]
    pub max_team_size: i32,
    #[validate(range(min = 1, message = "strict_team_size must be at least 1"))]
    pub strict_team_size: i32,
    #[serde(default)]
    pub strict_team_size_mode: bool,
    #[serde(default)]
    #[validate(range(min = 0, message = "min_total_score must not be negative"))]
    pub min_total_score: i32,
}

impl CreateTeamDistributionDto {
    fn into_new(self, course_id: i64) -> NewTeamDistribution {
        NewTeamDistribution {
            course_id,
            name: self.name,
            description: self.description,
            description_url: self.description_url,
            start_date: self.start_date,
            end_date: self.end_date,
            min_team_size: self.min_team_size,
            max_team_size: self.max_team_size,
            strict_team_size: self.strict_team_size,
            strict_team_size_mode: self.strict_team_size_mode,
            min_total_score: self.min_total_score,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTeamDistributionDto {
    #[validate(length(min = 1, max = 256, message = "name must be 1-256 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// An empty string clears the link.
    pub description_url: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub min_team_size: Option<i32>,
    #[validate(range(min = 1))]
    pub max_team_size: Option<i32>,
    #[validate(range(min = 1))]
    pub strict_team_size: Option<i32>,
    pub strict_team_size_mode: Option<bool>,
    #[validate(range(min = 0))]
    pub min_total_score: Option<i32>,
}

impl From<UpdateTeamDistributionDto> for TeamDistributionPatch {
    fn from(dto: UpdateTeamDistributionDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            description_url: dto.description_url,
            start_date: dto.start_date,
            end_date: dto.end_date,
            min_team_size: dto.min_team_size,
            max_team_size: dto.max_team_size,
            strict_team_size: dto.strict_team_size,
            strict_team_size_mode: dto.strict_team_size_mode,
            min_total_score: dto.min_total_score,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamDto {
    #[validate(length(min = 1, max = 256, message = "name must be 1-256 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(url(message = "chat_link must be a valid url"))]
    pub chat_link: Option<String>,
    #[validate(length(min = 1, message = "a team needs at least one student"))]
    pub student_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentsQuery {
    pub page_size: Option<i64>,
    pub current: Option<i64>,
}

impl StudentsQuery {
    fn pagination(&self) -> Pagination {
        Pagination::new(self.current.unwrap_or(1), self.page_size.unwrap_or(10))
    }
}

pub async fn create_team_distribution(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath(course_id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<CreateTeamDistributionDto>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, MANAGER_OR_ADMIN)?;
    let distribution = state
        .team_distributions
        .create(dto.into_new(course_id))
        .await?;
    Ok(created(distribution))
}

/// Every distribution of the course, with the caller's registration status.
pub async fn list_team_distributions(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath(course_id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let distributions = state
        .team_distributions
        .find_by_course_id(course_id, session.student_id(course_id), Utc::now())
        .await?;
    Ok(success(distributions))
}

pub async fn delete_team_distribution(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, MANAGER_OR_ADMIN)?;
    state.team_distributions.remove(course_id, id).await?;
    Ok(ok_message("team distribution deleted"))
}

pub async fn update_team_distribution(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, id)): ApiPath<(i64, i64)>,
    ValidatedJson(dto): ValidatedJson<UpdateTeamDistributionDto>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, MANAGER_OR_ADMIN)?;
    let distribution = state
        .team_distributions
        .update(course_id, id, dto.into())
        .await?;
    Ok(success(distribution))
}

pub async fn register_student(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, STUDENT)?;
    let student_id = require_student(&session, course_id)?;

    state
        .team_distributions
        .register_student(course_id, id, student_id, Utc::now())
        .await?;
    Ok(ok_message("registered"))
}

pub async fn unregister_student(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, STUDENT)?;
    let student_id = require_student(&session, course_id)?;

    state
        .team_distributions
        .unregister_student(course_id, id, student_id)
        .await?;
    Ok(ok_message("unregistered"))
}

pub async fn get_detailed(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, STUDENT_MANAGER_OR_ADMIN)?;
    require_registered_student_or_manager(&state, &session, course_id, id).await?;

    let details = state
        .team_distributions
        .get_detailed(course_id, id, session.student_id(course_id))
        .await?;
    Ok(success(details))
}

/// Registered students who are not in a team yet.
pub async fn get_students_without_team(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, id)): ApiPath<(i64, i64)>,
    ApiQuery(query): ApiQuery<StudentsQuery>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, STUDENT_MANAGER_OR_ADMIN)?;
    require_registered_student_or_manager(&state, &session, course_id, id).await?;

    let page = state
        .team_distributions
        .students_without_team(course_id, id, query.pagination())
        .await?;
    Ok(success(PaginatedResponse::from(page)))
}

pub async fn create_team(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiPath((course_id, id)): ApiPath<(i64, i64)>,
    ValidatedJson(dto): ValidatedJson<CreateTeamDto>,
) -> ApiResult<impl IntoResponse> {
    require_roles(&session, course_id, MANAGER_OR_ADMIN)?;
    let team = state
        .team_distributions
        .create_team(
            course_id,
            id,
            CreateTeamCommand {
                name: dto.name,
                description: dto.description,
                chat_link: dto.chat_link,
                student_ids: dto.student_ids,
            },
        )
        .await?;
    Ok(created(team))
}
