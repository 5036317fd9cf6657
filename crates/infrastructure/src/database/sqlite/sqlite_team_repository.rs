use async_trait::async_trait;
use course_domain::entities::{NewTeam, Team, TeamWithStudents};
use course_domain::repositories::TeamRepository;
use course_errors::{CourseError, CourseResult};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, instrument};

use super::SqliteStudentRepository;

pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_team(row: &SqliteRow) -> CourseResult<Team> {
        Ok(Team {
            id: row.try_get("id")?,
            team_distribution_id: row.try_get("team_distribution_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            chat_link: row.try_get("chat_link")?,
        })
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    #[instrument(skip(self, team), fields(team_distribution_id = team.team_distribution_id))]
    async fn create(&self, team: &NewTeam) -> CourseResult<TeamWithStudents> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO teams (team_distribution_id, name, description, chat_link) VALUES ($1, $2, $3, $4)",
        )
        .bind(team.team_distribution_id)
        .bind(&team.name)
        .bind(&team.description)
        .bind(&team.chat_link)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        for student_id in &team.student_ids {
            sqlx::query("INSERT INTO team_students (team_id, student_id) VALUES ($1, $2)")
                .bind(id)
                .bind(*student_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!(team_id = id, members = team.student_ids.len(), "team created");

        self.find_with_students(id)
            .await?
            .ok_or(CourseError::TeamNotFound { id })
    }

    #[instrument(skip(self))]
    async fn find_with_students(&self, id: i64) -> CourseResult<Option<TeamWithStudents>> {
        let Some(row) = sqlx::query("SELECT * FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        let team = Self::row_to_team(&row)?;

        let sql = format!(
            "{} JOIN team_students ts ON ts.student_id = s.id WHERE ts.team_id = $1 ORDER BY s.id",
            SqliteStudentRepository::select_students()
        );
        let students = sqlx::query(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(SqliteStudentRepository::row_to_student)
            .collect::<CourseResult<Vec<_>>>()?;

        Ok(Some(TeamWithStudents { team, students }))
    }

    #[instrument(skip(self))]
    async fn find_student_team(&self, team_distribution_id: i64, student_id: i64) -> CourseResult<Option<Team>> {
        let row = sqlx::query(
            r#"
            SELECT t.* FROM teams t
            JOIN team_students ts ON ts.team_id = t.id
            WHERE t.team_distribution_id = $1 AND ts.student_id = $2
            "#,
        )
        .bind(team_distribution_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::row_to_team).transpose()
    }

    async fn team_distribution_ids_for_student(&self, student_id: i64) -> CourseResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            r#"
            SELECT DISTINCT t.team_distribution_id FROM teams t
            JOIN team_students ts ON ts.team_id = t.id
            WHERE ts.student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn count_by_distribution(&self, team_distribution_id: i64) -> CourseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM teams WHERE team_distribution_id = $1")
            .bind(team_distribution_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
