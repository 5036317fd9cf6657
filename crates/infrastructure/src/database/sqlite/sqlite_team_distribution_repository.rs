use async_trait::async_trait;
use chrono::Utc;
use course_domain::entities::{NewTeamDistribution, TeamDistribution};
use course_domain::repositories::TeamDistributionRepository;
use course_errors::{CourseError, CourseResult};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, instrument};

pub struct SqliteTeamDistributionRepository {
    pool: SqlitePool,
}

impl SqliteTeamDistributionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_distribution(row: &SqliteRow) -> CourseResult<TeamDistribution> {
        Ok(TeamDistribution {
            id: row.try_get("id")?,
            course_id: row.try_get("course_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            description_url: row.try_get("description_url")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            min_team_size: row.try_get("min_team_size")?,
            max_team_size: row.try_get("max_team_size")?,
            strict_team_size: row.try_get("strict_team_size")?,
            strict_team_size_mode: row.try_get("strict_team_size_mode")?,
            min_total_score: row.try_get("min_total_score")?,
            created_date: row.try_get("created_date")?,
            updated_date: row.try_get("updated_date")?,
        })
    }
}

#[async_trait]
impl TeamDistributionRepository for SqliteTeamDistributionRepository {
    #[instrument(skip(self, distribution), fields(course_id = distribution.course_id))]
    async fn create(&self, distribution: &NewTeamDistribution) -> CourseResult<TeamDistribution> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO team_distributions (
                course_id, name, description, description_url, start_date, end_date,
                min_team_size, max_team_size, strict_team_size, strict_team_size_mode,
                min_total_score, created_date, updated_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            "#,
        )
        .bind(distribution.course_id)
        .bind(&distribution.name)
        .bind(&distribution.description)
        .bind(&distribution.description_url)
        .bind(distribution.start_date)
        .bind(distribution.end_date)
        .bind(distribution.min_team_size)
        .bind(distribution.max_team_size)
        .bind(distribution.strict_team_size)
        .bind(distribution.strict_team_size_mode)
        .bind(distribution.min_total_score)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(team_distribution_id = id, "team distribution created");
        self.find_by_id(id)
            .await?
            .ok_or(CourseError::TeamDistributionNotFound { id })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<TeamDistribution>> {
        let row = sqlx::query("SELECT * FROM team_distributions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_distribution).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_course(&self, course_id: i64) -> CourseResult<Vec<TeamDistribution>> {
        let rows = sqlx::query(
            "SELECT * FROM team_distributions WHERE course_id = $1 ORDER BY start_date, id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_distribution).collect()
    }

    #[instrument(skip(self, distribution), fields(team_distribution_id = distribution.id))]
    async fn update(&self, distribution: &TeamDistribution) -> CourseResult<TeamDistribution> {
        let result = sqlx::query(
            r#"
            UPDATE team_distributions SET
                name = $1, description = $2, description_url = $3, start_date = $4,
                end_date = $5, min_team_size = $6, max_team_size = $7, strict_team_size = $8,
                strict_team_size_mode = $9, min_total_score = $10, updated_date = $11
            WHERE id = $12
            "#,
        )
        .bind(&distribution.name)
        .bind(&distribution.description)
        .bind(&distribution.description_url)
        .bind(distribution.start_date)
        .bind(distribution.end_date)
        .bind(distribution.min_team_size)
        .bind(distribution.max_team_size)
        .bind(distribution.strict_team_size)
        .bind(distribution.strict_team_size_mode)
        .bind(distribution.min_total_score)
        .bind(Utc::now())
        .bind(distribution.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CourseError::TeamDistributionNotFound { id: distribution.id });
        }
        self.find_by_id(distribution.id)
            .await?
            .ok_or(CourseError::TeamDistributionNotFound { id: distribution.id })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> CourseResult<bool> {
        let result = sqlx::query("DELETE FROM team_distributions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn register_student(&self, team_distribution_id: i64, student_id: i64) -> CourseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO team_distribution_students (team_distribution_id, student_id)
            VALUES ($1, $2)
            ON CONFLICT (team_distribution_id, student_id) DO NOTHING
            "#,
        )
        .bind(team_distribution_id)
        .bind(student_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn unregister_student(&self, team_distribution_id: i64, student_id: i64) -> CourseResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM team_students
            WHERE student_id = $1
              AND team_id IN (SELECT id FROM teams WHERE team_distribution_id = $2)
            "#,
        )
        .bind(student_id)
        .bind(team_distribution_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "DELETE FROM team_distribution_students WHERE team_distribution_id = $1 AND student_id = $2",
        )
        .bind(team_distribution_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_student_registered(&self, team_distribution_id: i64, student_id: i64) -> CourseResult<bool> {
        let registered: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM team_distribution_students
                WHERE team_distribution_id = $1 AND student_id = $2
            )
            "#,
        )
        .bind(team_distribution_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(registered != 0)
    }

    async fn registered_distribution_ids(&self, student_id: i64) -> CourseResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            "SELECT team_distribution_id FROM team_distribution_students WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
