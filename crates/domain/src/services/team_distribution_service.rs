use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use course_errors::{CourseError, CourseResult};

use crate::entities::{
    NewTeam, NewTeamDistribution, Paginated, Pagination, Student, TeamDistribution,
    TeamDistributionPatch, TeamWithStudents,
};
use crate::repositories::{StudentRepository, TeamDistributionRepository, TeamRepository};
use crate::team_distribution::{registration_status, RegistrationStatus, StudentDistributionState};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TeamDistributionView {
    #[serde(flatten)]
    pub distribution: TeamDistribution,
    pub registration_status: RegistrationStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TeamDistributionDetails {
    #[serde(flatten)]
    pub distribution: TeamDistribution,
    pub teams_count: i64,
    pub students_without_team_count: i64,
    pub my_team: Option<TeamWithStudents>,
}

#[derive(Debug, Clone)]
pub struct CreateTeamCommand {
    pub name: String,
    pub description: String,
    pub chat_link: Option<String>,
    pub student_ids: Vec<i64>,
}

/// Team distribution use cases shared by the HTTP handlers.
#[derive(Clone)]
pub struct TeamDistributionService {
    distributions: Arc<dyn TeamDistributionRepository>,
    students: Arc<dyn StudentRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl TeamDistributionService {
    pub fn new(
        distributions: Arc<dyn TeamDistributionRepository>,
        students: Arc<dyn StudentRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Self {
        Self {
            distributions,
            students,
            teams,
        }
    }

    pub async fn create(&self, distribution: NewTeamDistribution) -> CourseResult<TeamDistribution> {
        distribution.validate()?;
        let created = self.distributions.create(&distribution).await?;
        info!(
            course_id = created.course_id,
            team_distribution_id = created.id,
            "team distribution created"
        );
        Ok(created)
    }

    /// Loads a distribution, treating one from another course as missing.
    pub async fn get_by_id(&self, course_id: i64, id: i64) -> CourseResult<TeamDistribution> {
        self.distributions
            .find_by_id(id)
            .await?
            .filter(|distribution| distribution.course_id == course_id)
            .ok_or(CourseError::TeamDistributionNotFound { id })
    }

    pub async fn find_by_course_id(
        &self,
        course_id: i64,
        student_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> CourseResult<Vec<TeamDistributionView>> {
        let distributions = self.distributions.find_by_course(course_id).await?;

        let student = match student_id {
            Some(id) => self.students.find_by_id(id).await?,
            None => None,
        };
        let (registered, in_team): (HashSet<i64>, HashSet<i64>) = match &student {
            Some(student) => (
                self.distributions
                    .registered_distribution_ids(student.id)
                    .await?
                    .into_iter()
                    .collect(),
                self.teams
                    .team_distribution_ids_for_student(student.id)
                    .await?
                    .into_iter()
                    .collect(),
            ),
            None => Default::default(),
        };

        Ok(distributions
            .into_iter()
            .map(|distribution| {
                let state = student.as_ref().map(|student| StudentDistributionState {
                    total_score: student.total_score,
                    registered: registered.contains(&distribution.id),
                    in_team: in_team.contains(&distribution.id),
                });
                let registration_status = registration_status(&distribution, state.as_ref(), now);
                TeamDistributionView {
                    distribution,
                    registration_status,
                }
            })
            .collect())
    }

    pub async fn update(
        &self,
        course_id: i64,
        id: i64,
        patch: TeamDistributionPatch,
    ) -> CourseResult<TeamDistribution> {
        let mut distribution = self.get_by_id(course_id, id).await?;
        distribution.apply(patch)?;
        let updated = self.distributions.update(&distribution).await?;
        info!(team_distribution_id = id, "team distribution updated");
        Ok(updated)
    }

    pub async fn remove(&self, course_id: i64, id: i64) -> CourseResult<()> {
        self.get_by_id(course_id, id).await?;
        self.distributions.delete(id).await?;
        info!(team_distribution_id = id, "team distribution deleted");
        Ok(())
    }

    async fn course_student(&self, course_id: i64, student_id: i64) -> CourseResult<Student> {
        self.students
            .find_by_id(student_id)
            .await?
            .filter(|student| student.course_id == course_id)
            .ok_or(CourseError::StudentNotFound { id: student_id })
    }

    pub async fn register_student(
        &self,
        course_id: i64,
        id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> CourseResult<()> {
        let distribution = self.get_by_id(course_id, id).await?;
        let student = self.course_student(course_id, student_id).await?;

        if student.is_expelled {
            return Err(CourseError::permission("expelled students cannot register"));
        }
        if !distribution.is_registration_open(now) {
            return Err(CourseError::validation_error(
                "registration for this distribution is closed",
            ));
        }
        if student.total_score < distribution.min_total_score {
            return Err(CourseError::validation_error(format!(
                "a total score of at least {} is required",
                distribution.min_total_score
            )));
        }

        self.distributions.register_student(id, student.id).await?;
        info!(team_distribution_id = id, student_id, "student registered");
        Ok(())
    }

    pub async fn unregister_student(&self, course_id: i64, id: i64, student_id: i64) -> CourseResult<()> {
        self.get_by_id(course_id, id).await?;
        let removed = self.distributions.unregister_student(id, student_id).await?;
        debug!(team_distribution_id = id, student_id, removed, "student unregistered");
        Ok(())
    }

    pub async fn is_student_registered(&self, id: i64, student_id: i64) -> CourseResult<bool> {
        self.distributions.is_student_registered(id, student_id).await
    }

    pub async fn get_detailed(
        &self,
        course_id: i64,
        id: i64,
        student_id: Option<i64>,
    ) -> CourseResult<TeamDistributionDetails> {
        let distribution = self.get_by_id(course_id, id).await?;

        let my_team = match student_id {
            Some(student_id) => match self.teams.find_student_team(id, student_id).await? {
                Some(team) => self.teams.find_with_students(team.id).await?,
                None => None,
            },
            None => None,
        };
        let teams_count = self.teams.count_by_distribution(id).await?;
        let students_without_team_count = self
            .students
            .find_without_team(id, Pagination::new(1, 1))
            .await?
            .total;

        Ok(TeamDistributionDetails {
            distribution,
            teams_count,
            students_without_team_count,
            my_team,
        })
    }

    pub async fn students_without_team(
        &self,
        course_id: i64,
        id: i64,
        pagination: Pagination,
    ) -> CourseResult<Paginated<Student>> {
        self.get_by_id(course_id, id).await?;
        self.students.find_without_team(id, pagination).await
    }

    pub async fn create_team(
        &self,
        course_id: i64,
        id: i64,
        command: CreateTeamCommand,
    ) -> CourseResult<TeamWithStudents> {
        let distribution = self.get_by_id(course_id, id).await?;

        if command.name.trim().is_empty() {
            return Err(CourseError::validation_error("team name must not be empty"));
        }
        let unique: HashSet<i64> = command.student_ids.iter().copied().collect();
        if unique.len() != command.student_ids.len() {
            return Err(CourseError::validation_error("duplicate students in team"));
        }
        let size = i32::try_from(command.student_ids.len())
            .map_err(|_| CourseError::validation_error("too many students in team"))?;
        if size > distribution.max_team_size {
            return Err(CourseError::validation_error(format!(
                "a team may have at most {} students",
                distribution.max_team_size
            )));
        }
        if distribution.strict_team_size_mode {
            if size != distribution.strict_team_size {
                return Err(CourseError::validation_error(format!(
                    "teams must have exactly {} students",
                    distribution.strict_team_size
                )));
            }
        } else if size < distribution.min_team_size {
            return Err(CourseError::validation_error(format!(
                "a team needs at least {} students",
                distribution.min_team_size
            )));
        }

        for student_id in &command.student_ids {
            self.course_student(course_id, *student_id).await?;
            if !self.distributions.is_student_registered(id, *student_id).await? {
                return Err(CourseError::validation_error(format!(
                    "student {student_id} is not registered in this distribution"
                )));
            }
            if self.teams.find_student_team(id, *student_id).await?.is_some() {
                return Err(CourseError::conflict(format!(
                    "student {student_id} already has a team in this distribution"
                )));
            }
        }

        let team = self
            .teams
            .create(&NewTeam {
                team_distribution_id: id,
                name: command.name,
                description: command.description,
                chat_link: command.chat_link,
                student_ids: command.student_ids,
            })
            .await?;
        info!(team_distribution_id = id, team_id = team.team.id, "team created");
        Ok(team)
    }
}
