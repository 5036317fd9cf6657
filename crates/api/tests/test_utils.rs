#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use course_api::{auth::JwtService, create_app, Repositories};
use course_config::ApiConfig;
use course_domain::entities::{Course, CourseUser, NewCourse, NewStudent, NewUser};
use course_domain::repositories::{CourseRepository, StudentRepository, UserRepository};
use course_infrastructure::*;

pub struct TestUser {
    pub user_id: i64,
    pub token: String,
    pub student_id: Option<i64>,
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseManager,
    pub course: Course,
    pub jwt: JwtService,
    pub admin: TestUser,
    pub manager: TestUser,
    pub mentor: TestUser,
    pub student: TestUser,
    pub weak_student: TestUser,
    pub outsider: TestUser,
}

impl TestApp {
    /// A course with one user per role. `student` has 100 points,
    /// `weak_student` has 10.
    pub async fn spawn() -> Result<Self> {
        let db = DatabaseManager::in_memory().await?;
        let pool = db.pool().clone();
        let config = ApiConfig::default();
        let jwt = JwtService::new(&config.auth.jwt_secret, config.auth.jwt_expiration_hours);

        let users = Arc::new(SqliteUserRepository::new(pool.clone()));
        let courses = Arc::new(SqliteCourseRepository::new(pool.clone()));
        let students = Arc::new(SqliteStudentRepository::new(pool.clone()));

        let now = Utc::now();
        let course = courses
            .create(&NewCourse {
                name: "JavaScript / Front-end".to_string(),
                alias: "js-fe-2026".to_string(),
                description: None,
                start_date: now - Duration::days(30),
                end_date: now + Duration::days(90),
                completed: false,
            })
            .await?;

        let create_user = |github_id: &'static str, is_admin: bool| {
            let users = users.clone();
            async move {
                users
                    .create(&NewUser {
                        github_id: github_id.to_string(),
                        first_name: github_id.to_string(),
                        last_name: String::new(),
                        is_admin,
                    })
                    .await
            }
        };

        let admin = create_user("admin", true).await?;
        let manager = create_user("manager", false).await?;
        let mentor = create_user("mentor", false).await?;
        let student = create_user("student", false).await?;
        let weak_student = create_user("weak-student", false).await?;
        let outsider = create_user("outsider", false).await?;

        users
            .assign_course_roles(&CourseUser {
                course_id: course.id,
                user_id: manager.id,
                is_manager: true,
                ..Default::default()
            })
            .await?;
        users.create_mentor(mentor.id, course.id).await?;
        let student_record = students
            .create(&NewStudent {
                user_id: student.id,
                course_id: course.id,
                total_score: 100,
                rank: Some(1),
            })
            .await?;
        let weak_record = students
            .create(&NewStudent {
                user_id: weak_student.id,
                course_id: course.id,
                total_score: 10,
                rank: Some(2),
            })
            .await?;

        let test_user = |user_id: i64, github_id: &str, student_id: Option<i64>| -> Result<TestUser> {
            Ok(TestUser {
                user_id,
                token: jwt.generate_token(user_id, github_id)?,
                student_id,
            })
        };
        let admin = test_user(admin.id, "admin", None)?;
        let manager = test_user(manager.id, "manager", None)?;
        let mentor = test_user(mentor.id, "mentor", None)?;
        let student = test_user(student.id, "student", Some(student_record.id))?;
        let weak_student = test_user(weak_student.id, "weak-student", Some(weak_record.id))?;
        let outsider = test_user(outsider.id, "outsider", None)?;

        let repositories = Repositories {
            users,
            courses,
            course_tasks: Arc::new(SqliteCourseTaskRepository::new(pool.clone())),
            students,
            team_distributions: Arc::new(SqliteTeamDistributionRepository::new(pool.clone())),
            teams: Arc::new(SqliteTeamRepository::new(pool.clone())),
            interviews: Arc::new(SqliteTaskInterviewStudentRepository::new(pool)),
        };
        let router = create_app(repositories, &config);

        Ok(Self {
            router,
            db,
            course,
            jwt,
            admin,
            manager,
            mentor,
            student,
            weak_student,
            outsider,
        })
    }

    pub fn course_path(&self, suffix: &str) -> String {
        format!("/api/courses/{}{}", self.course.id, suffix)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }
}
