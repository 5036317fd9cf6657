use async_trait::async_trait;
use course_domain::entities::{CourseUser, Mentor, NewUser, User};
use course_domain::repositories::UserRepository;
use course_domain::{CourseRole, Session};
use course_errors::CourseResult;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, instrument};

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &SqliteRow) -> CourseResult<User> {
        Ok(User {
            id: row.try_get("id")?,
            github_id: row.try_get("github_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_admin: row.try_get("is_admin")?,
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[instrument(skip(self, user), fields(github_id = %user.github_id))]
    async fn create(&self, user: &NewUser) -> CourseResult<User> {
        let result = sqlx::query(
            "INSERT INTO users (github_id, first_name, last_name, is_admin) VALUES ($1, $2, $3, $4)",
        )
        .bind(&user.github_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_admin)
        .execute(&self.pool)
        .await?;

        let created = User {
            id: result.last_insert_rowid(),
            github_id: user.github_id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_admin: user.is_admin,
        };
        debug!(user_id = created.id, "user created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> CourseResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, github_id, first_name, last_name, is_admin FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    #[instrument(skip(self))]
    async fn assign_course_roles(&self, course_user: &CourseUser) -> CourseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO course_users (course_id, user_id, is_manager, is_supervisor, is_dementor)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (course_id, user_id) DO UPDATE SET
                is_manager = excluded.is_manager,
                is_supervisor = excluded.is_supervisor,
                is_dementor = excluded.is_dementor
            "#,
        )
        .bind(course_user.course_id)
        .bind(course_user.user_id)
        .bind(course_user.is_manager)
        .bind(course_user.is_supervisor)
        .bind(course_user.is_dementor)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_mentor(&self, user_id: i64, course_id: i64) -> CourseResult<Mentor> {
        let result = sqlx::query("INSERT INTO mentors (user_id, course_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(course_id)
            .execute(&self.pool)
            .await?;

        Ok(Mentor {
            id: result.last_insert_rowid(),
            user_id,
            course_id,
        })
    }

    #[instrument(skip(self))]
    async fn load_session(&self, user_id: i64) -> CourseResult<Option<Session>> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let mut session = Session::new(user.id, user.github_id, user.is_admin);

        let students = sqlx::query("SELECT id, course_id, is_expelled FROM students WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        for row in &students {
            let course_id: i64 = row.try_get("course_id")?;
            session.grant(course_id, CourseRole::Student);
            let info = session.course_mut(course_id);
            info.student_id = Some(row.try_get("id")?);
            info.is_expelled = row.try_get("is_expelled")?;
        }

        let mentors = sqlx::query("SELECT id, course_id FROM mentors WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        for row in &mentors {
            let course_id: i64 = row.try_get("course_id")?;
            session.grant(course_id, CourseRole::Mentor);
            session.course_mut(course_id).mentor_id = Some(row.try_get("id")?);
        }

        let staff = sqlx::query(
            "SELECT course_id, is_manager, is_supervisor, is_dementor FROM course_users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        for row in &staff {
            let course_id: i64 = row.try_get("course_id")?;
            for (column, role) in [
                ("is_manager", CourseRole::Manager),
                ("is_supervisor", CourseRole::Supervisor),
                ("is_dementor", CourseRole::Dementor),
            ] {
                if row.try_get::<bool, _>(column)? {
                    session.grant(course_id, role);
                }
            }
        }

        debug!(courses = session.courses.len(), "session loaded");
        Ok(Some(session))
    }
}
