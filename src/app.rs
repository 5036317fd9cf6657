use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use course_api::{auth::JwtService, create_app, Repositories};
use course_config::AppConfig;
use course_infrastructure::{
    CrossCheckScheduler, DatabaseManager, SqliteCourseRepository, SqliteCourseTaskRepository,
    SqliteStudentRepository, SqliteTaskInterviewStudentRepository,
    SqliteTeamDistributionRepository, SqliteTeamRepository, SqliteUserRepository,
};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{info, warn};

/// Components the binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// REST API only
    Api,
    /// Cross-check lifecycle scanner only
    Scheduler,
    All,
}

pub struct Application {
    config: AppConfig,
    mode: AppMode,
    database: DatabaseManager,
    repositories: Repositories,
}

impl Application {
    /// Connects the database, brings the schema up to date and builds the
    /// repositories.
    pub async fn new(config: AppConfig, mode: AppMode) -> Result<Self> {
        info!(?mode, "initialising application");

        let database = DatabaseManager::new(&config.database)
            .await
            .with_context(|| format!("failed to open database {}", config.database.url))?;
        database.migrate().await?;
        database
            .health_check()
            .await
            .context("database health check failed")?;

        let pool = database.pool().clone();
        let repositories = Repositories {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            courses: Arc::new(SqliteCourseRepository::new(pool.clone())),
            course_tasks: Arc::new(SqliteCourseTaskRepository::new(pool.clone())),
            students: Arc::new(SqliteStudentRepository::new(pool.clone())),
            team_distributions: Arc::new(SqliteTeamDistributionRepository::new(pool.clone())),
            teams: Arc::new(SqliteTeamRepository::new(pool.clone())),
            interviews: Arc::new(SqliteTaskInterviewStudentRepository::new(pool)),
        };

        Ok(Self {
            config,
            mode,
            database,
            repositories,
        })
    }

    pub async fn run(&self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        info!(mode = ?self.mode, "starting application");

        let result = match self.mode {
            AppMode::Api => self.run_api(shutdown_rx).await,
            AppMode::Scheduler => {
                self.run_scheduler(shutdown_rx).await;
                Ok(())
            }
            AppMode::All => {
                let (api, ()) = tokio::join!(
                    self.run_api(shutdown_rx.resubscribe()),
                    self.run_scheduler(shutdown_rx)
                );
                api
            }
        };

        self.database.close().await;
        info!("database pool closed");
        result
    }

    /// Issues a bearer token for an existing user.
    pub async fn issue_token(&self, user_id: i64) -> Result<String> {
        let user = self
            .repositories
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user {user_id} does not exist"))?;

        let auth = &self.config.api.auth;
        JwtService::new(&auth.jwt_secret, auth.jwt_expiration_hours)
            .generate_token(user.id, &user.github_id)
            .context("failed to sign token")
    }

    async fn run_api(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let bind_address = &self.config.api.bind_address;
        let app = create_app(self.repositories.clone(), &self.config.api);

        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("failed to bind {bind_address}"))?;
        info!("API server listening on http://{bind_address}");

        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API server received shutdown signal");
            })
            .await
            .context("API server failed")?;

        info!("API server stopped");
        Ok(())
    }

    async fn run_scheduler(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        if !self.config.cross_check.enabled {
            warn!("cross-check scheduler is disabled in configuration");
            let _ = shutdown_rx.recv().await;
            return;
        }

        let scheduler = CrossCheckScheduler::new(
            Arc::clone(&self.repositories.course_tasks),
            Duration::from_secs(self.config.cross_check.scan_interval_seconds),
        );
        scheduler.run(shutdown_rx).await;
        info!("cross-check scheduler stopped");
    }
}
