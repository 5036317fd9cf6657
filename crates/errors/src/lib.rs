use thiserror::Error;

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("course not found: {id}")]
    CourseNotFound { id: i64 },
    #[error("course task not found: {id}")]
    CourseTaskNotFound { id: i64 },
    #[error("team distribution not found: {id}")]
    TeamDistributionNotFound { id: i64 },
    #[error("team not found: {id}")]
    TeamNotFound { id: i64 },
    #[error("student not found: {id}")]
    StudentNotFound { id: i64 },
    #[error("user not found: {id}")]
    UserNotFound { id: i64 },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("permission denied: {0}")]
    Permission(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type CourseResult<T> = Result<T, CourseError>;

impl CourseError {
    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        Self::Conflict(msg.into())
    }
    pub fn validation_error<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
    pub fn permission<S: Into<String>>(msg: S) -> Self {
        Self::Permission(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CourseError::CourseNotFound { .. }
                | CourseError::CourseTaskNotFound { .. }
                | CourseError::TeamDistributionNotFound { .. }
                | CourseError::TeamNotFound { .. }
                | CourseError::StudentNotFound { .. }
                | CourseError::UserNotFound { .. }
        )
    }

    pub fn user_message(&self) -> &str {
        match self {
            CourseError::CourseNotFound { .. } => "The requested course does not exist",
            CourseError::CourseTaskNotFound { .. } => "The requested course task does not exist",
            CourseError::TeamDistributionNotFound { .. } => {
                "The requested team distribution does not exist"
            }
            CourseError::TeamNotFound { .. } => "The requested team does not exist",
            CourseError::StudentNotFound { .. } => "The requested student does not exist",
            CourseError::UserNotFound { .. } => "The requested user does not exist",
            CourseError::Conflict(_) => "The request conflicts with existing data",
            CourseError::Validation(_) => "Input validation failed",
            CourseError::Permission(_) => "You are not allowed to perform this action",
            _ => "The service is busy, please retry later",
        }
    }
}

impl From<sqlx::Error> for CourseError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return CourseError::Conflict(db_err.message().to_string());
            }
        }
        CourseError::Database(err)
    }
}

impl From<serde_json::Error> for CourseError {
    fn from(err: serde_json::Error) -> Self {
        CourseError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for CourseError {
    fn from(err: anyhow::Error) -> Self {
        CourseError::Internal(err.to_string())
    }
}
