use async_trait::async_trait;
use course_domain::entities::{NewStudent, Paginated, Pagination, Student};
use course_domain::repositories::StudentRepository;
use course_errors::{CourseError, CourseResult};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, instrument};

const STUDENT_COLUMNS: &str = r#"
    s.id, s.user_id, s.course_id, s.is_expelled, s.total_score, s.rank,
    u.github_id, u.first_name, u.last_name
"#;

pub struct SqliteStudentRepository {
    pool: SqlitePool,
}

impl SqliteStudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_student(row: &SqliteRow) -> CourseResult<Student> {
        Ok(Student {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            course_id: row.try_get("course_id")?,
            github_id: row.try_get("github_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_expelled: row.try_get("is_expelled")?,
            total_score: row.try_get("total_score")?,
            rank: row.try_get("rank")?,
        })
    }

    pub(crate) fn select_students() -> String {
        format!("SELECT {STUDENT_COLUMNS} FROM students s JOIN users u ON u.id = s.user_id")
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    #[instrument(skip(self, student), fields(user_id = student.user_id, course_id = student.course_id))]
    async fn create(&self, student: &NewStudent) -> CourseResult<Student> {
        let result = sqlx::query(
            "INSERT INTO students (user_id, course_id, total_score, rank) VALUES ($1, $2, $3, $4)",
        )
        .bind(student.user_id)
        .bind(student.course_id)
        .bind(student.total_score)
        .bind(student.rank)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(student_id = id, "student created");
        self.find_by_id(id)
            .await?
            .ok_or(CourseError::StudentNotFound { id })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<Student>> {
        let sql = format!("{} WHERE s.id = $1", Self::select_students());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_student).transpose()
    }

    #[instrument(skip(self))]
    async fn set_expelled(&self, id: i64, is_expelled: bool) -> CourseResult<()> {
        let result = sqlx::query("UPDATE students SET is_expelled = $1 WHERE id = $2")
            .bind(is_expelled)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CourseError::StudentNotFound { id });
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_without_team(
        &self,
        team_distribution_id: i64,
        pagination: Pagination,
    ) -> CourseResult<Paginated<Student>> {
        let filter = r#"
            JOIN team_distribution_students tds
                ON tds.student_id = s.id AND tds.team_distribution_id = $1
            WHERE s.is_expelled = 0
              AND NOT EXISTS (
                SELECT 1 FROM team_students ts
                JOIN teams t ON t.id = ts.team_id
                WHERE ts.student_id = s.id AND t.team_distribution_id = $1
              )
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM students s {filter}"
        ))
        .bind(team_distribution_id)
        .fetch_one(&self.pool)
        .await?;

        // Unranked students go last.
        let sql = format!(
            "{} {filter} ORDER BY s.rank IS NULL, s.rank, s.total_score DESC, s.id LIMIT $2 OFFSET $3",
            Self::select_students()
        );
        let rows = sqlx::query(&sql)
            .bind(team_distribution_id)
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Paginated {
            items: rows
                .iter()
                .map(Self::row_to_student)
                .collect::<CourseResult<Vec<_>>>()?,
            total,
            page: pagination.page,
            limit: pagination.limit,
        })
    }
}
