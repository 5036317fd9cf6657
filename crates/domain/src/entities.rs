use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub github_id: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub github_id: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub alias: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub alias: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub completed: bool,
}

/// Per-course staff flags of a user.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseUser {
    pub course_id: i64,
    pub user_id: i64,
    pub is_manager: bool,
    pub is_supervisor: bool,
    pub is_dementor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub github_id: String,
    pub first_name: String,
    pub last_name: String,
    pub is_expelled: bool,
    pub total_score: i32,
    pub rank: Option<i32>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub user_id: i64,
    pub course_id: i64,
    pub total_score: i32,
    pub rank: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mentor {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseTask {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub student_start_date: Option<DateTime<Utc>>,
    pub student_end_date: Option<DateTime<Utc>>,
    pub cross_check_end_date: Option<DateTime<Utc>>,
    pub cross_check_status: CrossCheckStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseTask {
    pub course_id: i64,
    pub name: String,
    pub student_start_date: Option<DateTime<Utc>>,
    pub student_end_date: Option<DateTime<Utc>>,
    pub cross_check_end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrossCheckStatus {
    #[default]
    Initial,
    Distributed,
    Completed,
}

impl CrossCheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrossCheckStatus::Initial => "initial",
            CrossCheckStatus::Distributed => "distributed",
            CrossCheckStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for CrossCheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(CrossCheckStatus::Initial),
            "distributed" => Ok(CrossCheckStatus::Distributed),
            "completed" => Ok(CrossCheckStatus::Completed),
            _ => Err(format!("Invalid cross-check status: {s}")),
        }
    }
}

impl std::fmt::Display for CrossCheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl sqlx::Type<sqlx::Sqlite> for CrossCheckStatus {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <str as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <str as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for CrossCheckStatus {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        s.parse::<CrossCheckStatus>().map_err(Into::into)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for CrossCheckStatus {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Sqlite>>::encode(self.as_str(), buf)
    }
}

/// A student's registration for the interview of a course task.
///
/// Unique on `(student_id, course_id, course_task_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskInterviewStudent {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub student_id: i64,
    pub course_id: Option<i64>,
    pub course_task_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamDistribution {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub description: String,
    pub description_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_team_size: i32,
    pub max_team_size: i32,
    pub strict_team_size: i32,
    pub strict_team_size_mode: bool,
    pub min_total_score: i32,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeamDistribution {
    pub course_id: i64,
    pub name: String,
    pub description: String,
    pub description_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_team_size: i32,
    pub max_team_size: i32,
    pub strict_team_size: i32,
    pub strict_team_size_mode: bool,
    pub min_total_score: i32,
}

/// Partial update of a distribution; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamDistributionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub description_url: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_team_size: Option<i32>,
    pub max_team_size: Option<i32>,
    pub strict_team_size: Option<i32>,
    pub strict_team_size_mode: Option<bool>,
    pub min_total_score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: i64,
    pub team_distribution_id: i64,
    pub name: String,
    pub description: String,
    pub chat_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamWithStudents {
    pub team: Team,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeam {
    pub team_distribution_id: i64,
    pub name: String,
    pub description: String,
    pub chat_link: Option<String>,
    pub student_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub const MAX_LIMIT: i64 = 100;
    /// Keeps `offset()` within `i64` for every allowed limit.
    pub const MAX_PAGE: i64 = i64::MAX / Self::MAX_LIMIT;

    /// Pages are 1-based; out-of-range values are clamped.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.clamp(1, Self::MAX_PAGE),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Paginated<T> {
    pub fn total_pages(&self) -> i64 {
        if self.limit > 0 {
            (self.total + self.limit - 1) / self.limit
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_check_status_parsing() {
        assert_eq!("initial".parse(), Ok(CrossCheckStatus::Initial));
        assert_eq!("distributed".parse(), Ok(CrossCheckStatus::Distributed));
        assert_eq!("completed".parse(), Ok(CrossCheckStatus::Completed));
        assert!("Initial".parse::<CrossCheckStatus>().is_err());
        assert_eq!(CrossCheckStatus::default(), CrossCheckStatus::Initial);
    }

    #[test]
    fn test_cross_check_status_serde_matches_storage() {
        for status in [
            CrossCheckStatus::Initial,
            CrossCheckStatus::Distributed,
            CrossCheckStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_pagination_clamps() {
        let page = Pagination::new(0, 500);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, Pagination::MAX_LIMIT);
        assert_eq!(page.offset(), 0);

        assert_eq!(Pagination::new(3, 10).offset(), 20);
        assert_eq!(Pagination::new(2, 0).limit, 1);
    }

    #[test]
    fn test_pagination_offset_never_overflows() {
        let page = Pagination::new(i64::MAX, Pagination::MAX_LIMIT);
        assert_eq!(page.page, Pagination::MAX_PAGE);
        assert!(page.offset() > 0);
        assert!(page.offset() <= i64::MAX - Pagination::MAX_LIMIT);
    }

    #[test]
    fn test_paginated_total_pages() {
        let page = Paginated::<i32> {
            items: vec![],
            total: 21,
            page: 1,
            limit: 10,
        };
        assert_eq!(page.total_pages(), 3);

        let empty = Paginated::<i32> {
            items: vec![],
            total: 0,
            page: 1,
            limit: 10,
        };
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        let user = User {
            id: 1,
            github_id: "octocat".to_string(),
            first_name: "Mona".to_string(),
            last_name: String::new(),
            is_admin: false,
        };
        assert_eq!(user.full_name(), "Mona");
    }
}
