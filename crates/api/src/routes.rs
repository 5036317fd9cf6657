use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use course_domain::repositories::{
    CourseRepository, CourseTaskRepository, TaskInterviewStudentRepository, UserRepository,
};
use course_domain::TeamDistributionService;

use crate::auth::{auth_middleware, guards::course_guard, JwtService};
use crate::handlers::{
    course_tasks::list_course_tasks,
    health::health_check,
    interviews::{list_interview_students, register_for_interview},
    links::{get_links, get_navigation},
    session::get_session,
    team_distribution::{
        create_team, create_team_distribution, delete_team_distribution, get_detailed,
        get_students_without_team, list_team_distributions, register_student, unregister_student,
        update_team_distribution,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub course_tasks: Arc<dyn CourseTaskRepository>,
    pub interviews: Arc<dyn TaskInterviewStudentRepository>,
    pub team_distributions: TeamDistributionService,
    pub jwt: Arc<JwtService>,
}

pub fn create_routes(state: AppState) -> Router {
    let course_routes = Router::new()
        .route("/api/courses/{course_id}/links", get(get_links))
        .route("/api/courses/{course_id}/navigation", get(get_navigation))
        .route("/api/courses/{course_id}/tasks", get(list_course_tasks))
        .route(
            "/api/courses/{course_id}/interviews/{course_task_id}/registration",
            post(register_for_interview),
        )
        .route(
            "/api/courses/{course_id}/interviews/{course_task_id}/students",
            get(list_interview_students),
        )
        .route(
            "/api/courses/{course_id}/team-distribution",
            get(list_team_distributions).post(create_team_distribution),
        )
        .route(
            "/api/courses/{course_id}/team-distribution/{id}",
            axum::routing::put(update_team_distribution).delete(delete_team_distribution),
        )
        .route(
            "/api/courses/{course_id}/team-distribution/{id}/registry",
            post(register_student).delete(unregister_student),
        )
        .route(
            "/api/courses/{course_id}/team-distribution/{id}/detailed",
            get(get_detailed),
        )
        .route(
            "/api/courses/{course_id}/team-distribution/{id}/students",
            get(get_students_without_team),
        )
        .route(
            "/api/courses/{course_id}/team-distribution/{id}/teams",
            post(create_team),
        )
        .route_layer(from_fn(course_guard));

    let api_routes = Router::new()
        .route("/api/session", get(get_session))
        .merge(course_routes)
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
        .with_state(state)
}
