#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use course_domain::entities::{Course, NewCourse, NewStudent, NewUser, Student, User};
use course_domain::repositories::{CourseRepository, StudentRepository, UserRepository};
use course_infrastructure::{
    DatabaseManager, SqliteCourseRepository, SqliteStudentRepository, SqliteUserRepository,
};
use sqlx::SqlitePool;

pub struct TestDatabase {
    pub manager: DatabaseManager,
}

impl TestDatabase {
    pub async fn new() -> Result<Self> {
        Ok(Self {
            manager: DatabaseManager::in_memory().await?,
        })
    }

    pub fn pool(&self) -> SqlitePool {
        self.manager.pool().clone()
    }

    pub async fn insert_user(&self, github_id: &str) -> Result<User> {
        let repo = SqliteUserRepository::new(self.pool());
        Ok(repo
            .create(&NewUser {
                github_id: github_id.to_string(),
                first_name: "Test".to_string(),
                last_name: github_id.to_string(),
                is_admin: false,
            })
            .await?)
    }

    pub async fn insert_course(&self, alias: &str) -> Result<Course> {
        let repo = SqliteCourseRepository::new(self.pool());
        let now = Utc::now();
        Ok(repo
            .create(&NewCourse {
                name: format!("Course {alias}"),
                alias: alias.to_string(),
                description: None,
                start_date: now - Duration::days(30),
                end_date: now + Duration::days(60),
                completed: false,
            })
            .await?)
    }

    pub async fn insert_student(&self, user_id: i64, course_id: i64, total_score: i32) -> Result<Student> {
        let repo = SqliteStudentRepository::new(self.pool());
        Ok(repo
            .create(&NewStudent {
                user_id,
                course_id,
                total_score,
                rank: None,
            })
            .await?)
    }
}

pub fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
