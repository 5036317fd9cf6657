use async_trait::async_trait;
use course_domain::entities::{CourseTask, CrossCheckStatus, NewCourseTask};
use course_domain::repositories::CourseTaskRepository;
use course_errors::CourseResult;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, instrument};

pub struct SqliteCourseTaskRepository {
    pool: SqlitePool,
}

impl SqliteCourseTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &SqliteRow) -> CourseResult<CourseTask> {
        Ok(CourseTask {
            id: row.try_get("id")?,
            course_id: row.try_get("course_id")?,
            name: row.try_get("name")?,
            student_start_date: row.try_get("student_start_date")?,
            student_end_date: row.try_get("student_end_date")?,
            cross_check_end_date: row.try_get("cross_check_end_date")?,
            cross_check_status: row.try_get("cross_check_status")?,
        })
    }
}

#[async_trait]
impl CourseTaskRepository for SqliteCourseTaskRepository {
    #[instrument(skip(self, task), fields(course_id = task.course_id))]
    async fn create(&self, task: &NewCourseTask) -> CourseResult<CourseTask> {
        let result = sqlx::query(
            r#"
            INSERT INTO course_tasks
                (course_id, name, student_start_date, student_end_date, cross_check_end_date, cross_check_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(task.course_id)
        .bind(&task.name)
        .bind(task.student_start_date)
        .bind(task.student_end_date)
        .bind(task.cross_check_end_date)
        .bind(CrossCheckStatus::Initial)
        .execute(&self.pool)
        .await?;

        Ok(CourseTask {
            id: result.last_insert_rowid(),
            course_id: task.course_id,
            name: task.name.clone(),
            student_start_date: task.student_start_date,
            student_end_date: task.student_end_date,
            cross_check_end_date: task.cross_check_end_date,
            cross_check_status: CrossCheckStatus::Initial,
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<CourseTask>> {
        let row = sqlx::query("SELECT * FROM course_tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_task).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_course(&self, course_id: i64) -> CourseResult<Vec<CourseTask>> {
        let rows = sqlx::query("SELECT * FROM course_tasks WHERE course_id = $1 ORDER BY id")
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_task).collect()
    }

    async fn find_open_cross_checks(&self) -> CourseResult<Vec<CourseTask>> {
        let rows = sqlx::query("SELECT * FROM course_tasks WHERE cross_check_status != $1 ORDER BY id")
            .bind(CrossCheckStatus::Completed)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_task).collect()
    }

    #[instrument(skip(self))]
    async fn transition_cross_check(
        &self,
        id: i64,
        from: CrossCheckStatus,
        to: CrossCheckStatus,
    ) -> CourseResult<bool> {
        // Compare-and-set on the stored status.
        let result = sqlx::query(
            "UPDATE course_tasks SET cross_check_status = $1 WHERE id = $2 AND cross_check_status = $3",
        )
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(&self.pool)
        .await?;

        let moved = result.rows_affected() == 1;
        debug!(moved, "cross-check status transition");
        Ok(moved)
    }
}
