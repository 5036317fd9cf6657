//! # Course API
//!
//! REST interface of the course platform, built on axum.
//!
//! Every `/api` route requires a bearer JWT; the caller's session is loaded
//! from the database per request. Routes under `/api/courses/{course_id}`
//! additionally require the caller to be an admin or a member of the course,
//! and handlers check their own role requirements on top.
//!
//! ## Endpoints
//!
//! - `GET /health`
//! - `GET /api/session`
//! - `GET /api/courses/{course_id}/links`, `GET .../navigation`
//! - `GET /api/courses/{course_id}/tasks`
//! - `POST /api/courses/{course_id}/interviews/{course_task_id}/registration`
//! - `GET /api/courses/{course_id}/interviews/{course_task_id}/students`
//! - `/api/courses/{course_id}/team-distribution[/{id}[/registry|/detailed|/students|/teams]]`
//!
//! Successful responses use the [`response::ApiResponse`] envelope; failures
//! return `{"error": {"message", "type", "code", "timestamp"}}`.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

use course_config::ApiConfig;
use course_domain::repositories::{
    CourseRepository, CourseTaskRepository, StudentRepository, TaskInterviewStudentRepository,
    TeamDistributionRepository, TeamRepository, UserRepository,
};
use course_domain::TeamDistributionService;

use auth::JwtService;
use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// Repositories the API reads and writes through.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub course_tasks: Arc<dyn CourseTaskRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub team_distributions: Arc<dyn TeamDistributionRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub interviews: Arc<dyn TaskInterviewStudentRepository>,
}

/// Builds the router with its middleware stack.
pub fn create_app(repositories: Repositories, api_config: &ApiConfig) -> Router {
    let state = AppState {
        team_distributions: TeamDistributionService::new(
            repositories.team_distributions,
            repositories.students,
            repositories.teams,
        ),
        users: repositories.users,
        courses: repositories.courses,
        course_tasks: repositories.course_tasks,
        interviews: repositories.interviews,
        jwt: Arc::new(JwtService::new(
            &api_config.auth.jwt_secret,
            api_config.auth.jwt_expiration_hours,
        )),
    };

    let router = create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(TimeoutLayer::new(Duration::from_secs(
                api_config.request_timeout_seconds,
            )))
            .layer(axum::middleware::from_fn(request_logging)),
    );

    if api_config.cors_enabled {
        router.layer(cors_layer(api_config))
    } else {
        router
    }
}
