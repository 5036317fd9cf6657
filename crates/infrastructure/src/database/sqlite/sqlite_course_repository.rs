use async_trait::async_trait;
use course_domain::entities::{Course, NewCourse};
use course_domain::repositories::CourseRepository;
use course_errors::CourseResult;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, instrument};

pub struct SqliteCourseRepository {
    pool: SqlitePool,
}

impl SqliteCourseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_course(row: &SqliteRow) -> CourseResult<Course> {
        Ok(Course {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            alias: row.try_get("alias")?,
            description: row.try_get("description")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            completed: row.try_get("completed")?,
        })
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    #[instrument(skip(self, course), fields(alias = %course.alias))]
    async fn create(&self, course: &NewCourse) -> CourseResult<Course> {
        let result = sqlx::query(
            r#"
            INSERT INTO courses (name, alias, description, start_date, end_date, completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&course.name)
        .bind(&course.alias)
        .bind(&course.description)
        .bind(course.start_date)
        .bind(course.end_date)
        .bind(course.completed)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(course_id = id, "course created");
        Ok(Course {
            id,
            name: course.name.clone(),
            alias: course.alias.clone(),
            description: course.description.clone(),
            start_date: course.start_date,
            end_date: course.end_date,
            completed: course.completed,
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<Course>> {
        let row = sqlx::query("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_course).transpose()
    }

    async fn find_all(&self) -> CourseResult<Vec<Course>> {
        let rows = sqlx::query("SELECT * FROM courses ORDER BY start_date DESC, id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_course).collect()
    }
}
