use async_trait::async_trait;
use chrono::Utc;
use course_domain::entities::TaskInterviewStudent;
use course_domain::repositories::TaskInterviewStudentRepository;
use course_errors::CourseResult;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, instrument};

pub struct SqliteTaskInterviewStudentRepository {
    pool: SqlitePool,
}

impl SqliteTaskInterviewStudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_registration(row: &SqliteRow) -> CourseResult<TaskInterviewStudent> {
        Ok(TaskInterviewStudent {
            id: row.try_get("id")?,
            created_date: row.try_get("created_date")?,
            updated_date: row.try_get("updated_date")?,
            student_id: row.try_get("student_id")?,
            course_id: row.try_get("course_id")?,
            course_task_id: row.try_get("course_task_id")?,
        })
    }
}

#[async_trait]
impl TaskInterviewStudentRepository for SqliteTaskInterviewStudentRepository {
    /// A second registration for the same task fails with `Conflict`.
    #[instrument(skip(self))]
    async fn create(
        &self,
        student_id: i64,
        course_id: Option<i64>,
        course_task_id: i64,
    ) -> CourseResult<TaskInterviewStudent> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO task_interview_students
                (created_date, updated_date, student_id, course_id, course_task_id)
            VALUES ($1, $1, $2, $3, $4)
            "#,
        )
        .bind(now)
        .bind(student_id)
        .bind(course_id)
        .bind(course_task_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(registration_id = id, "interview registration created");
        Ok(TaskInterviewStudent {
            id,
            created_date: now,
            updated_date: now,
            student_id,
            course_id,
            course_task_id,
        })
    }

    async fn find(
        &self,
        student_id: i64,
        course_id: i64,
        course_task_id: i64,
    ) -> CourseResult<Option<TaskInterviewStudent>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM task_interview_students
            WHERE student_id = $1 AND course_id = $2 AND course_task_id = $3
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .bind(course_task_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::row_to_registration).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_course_task(&self, course_id: i64, course_task_id: i64) -> CourseResult<Vec<TaskInterviewStudent>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM task_interview_students
            WHERE course_id = $1 AND course_task_id = $2
            ORDER BY created_date, id
            "#,
        )
        .bind(course_id)
        .bind(course_task_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_registration).collect()
    }

    async fn delete(&self, id: i64) -> CourseResult<bool> {
        let result = sqlx::query("DELETE FROM task_interview_students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
