use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use course_errors::{CourseError, CourseResult};

use crate::entities::{NewTeamDistribution, TeamDistribution, TeamDistributionPatch};

/// Where a student stands with respect to a distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Available,
    Future,
    Unavailable,
    Completed,
    Distributed,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentDistributionState {
    pub total_score: i32,
    pub registered: bool,
    pub in_team: bool,
}

/// Membership wins over dates: a student already placed in a team stays
/// `Distributed` after the window closes.
pub fn registration_status(
    distribution: &TeamDistribution,
    student: Option<&StudentDistributionState>,
    now: DateTime<Utc>,
) -> RegistrationStatus {
    if let Some(state) = student {
        if state.in_team {
            return RegistrationStatus::Distributed;
        }
        if state.registered {
            return RegistrationStatus::Completed;
        }
    }
    if now < distribution.start_date {
        return RegistrationStatus::Future;
    }
    if now > distribution.end_date {
        return RegistrationStatus::Closed;
    }
    match student {
        Some(state) if state.total_score < distribution.min_total_score => {
            RegistrationStatus::Unavailable
        }
        _ => RegistrationStatus::Available,
    }
}

struct DistributionShape<'a> {
    name: &'a str,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    min_team_size: i32,
    max_team_size: i32,
    strict_team_size: i32,
    strict_team_size_mode: bool,
    min_total_score: i32,
}

fn check_shape(shape: DistributionShape<'_>) -> CourseResult<()> {
    if shape.name.trim().is_empty() {
        return Err(CourseError::validation_error("name must not be empty"));
    }
    if shape.end_date <= shape.start_date {
        return Err(CourseError::validation_error(
            "end date must be after start date",
        ));
    }
    if shape.min_team_size < 1 {
        return Err(CourseError::validation_error(
            "minimum team size must be at least 1",
        ));
    }
    if shape.min_team_size > shape.max_team_size {
        return Err(CourseError::validation_error(
            "minimum team size must not exceed maximum team size",
        ));
    }
    if shape.strict_team_size_mode
        && !(shape.min_team_size..=shape.max_team_size).contains(&shape.strict_team_size)
    {
        return Err(CourseError::validation_error(
            "strict team size must lie between minimum and maximum team size",
        ));
    }
    if shape.min_total_score < 0 {
        return Err(CourseError::validation_error(
            "minimum total score must not be negative",
        ));
    }
    Ok(())
}

impl NewTeamDistribution {
    pub fn validate(&self) -> CourseResult<()> {
        check_shape(DistributionShape {
            name: &self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            min_team_size: self.min_team_size,
            max_team_size: self.max_team_size,
            strict_team_size: self.strict_team_size,
            strict_team_size_mode: self.strict_team_size_mode,
            min_total_score: self.min_total_score,
        })
    }
}

impl TeamDistribution {
    pub fn validate(&self) -> CourseResult<()> {
        check_shape(DistributionShape {
            name: &self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            min_team_size: self.min_team_size,
            max_team_size: self.max_team_size,
            strict_team_size: self.strict_team_size,
            strict_team_size_mode: self.strict_team_size_mode,
            min_total_score: self.min_total_score,
        })
    }

    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_date && now <= self.end_date
    }

    /// Applies the patch and re-checks the invariants of the result.
    pub fn apply(&mut self, patch: TeamDistributionPatch) -> CourseResult<()> {
        let mut updated = self.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(url) = patch.description_url {
            updated.description_url = if url.is_empty() { None } else { Some(url) };
        }
        if let Some(start_date) = patch.start_date {
            updated.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            updated.end_date = end_date;
        }
        if let Some(size) = patch.min_team_size {
            updated.min_team_size = size;
        }
        if let Some(size) = patch.max_team_size {
            updated.max_team_size = size;
        }
        if let Some(size) = patch.strict_team_size {
            updated.strict_team_size = size;
        }
        if let Some(mode) = patch.strict_team_size_mode {
            updated.strict_team_size_mode = mode;
        }
        if let Some(score) = patch.min_total_score {
            updated.min_total_score = score;
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn distribution() -> TeamDistribution {
        TeamDistribution {
            id: 1,
            course_id: 1,
            name: "Final project teams".to_string(),
            description: "Teams of 3-4".to_string(),
            description_url: None,
            start_date: now() - Duration::days(1),
            end_date: now() + Duration::days(6),
            min_team_size: 3,
            max_team_size: 4,
            strict_team_size: 3,
            strict_team_size_mode: false,
            min_total_score: 100,
            created_date: now(),
            updated_date: now(),
        }
    }

    fn state(total_score: i32, registered: bool, in_team: bool) -> StudentDistributionState {
        StudentDistributionState {
            total_score,
            registered,
            in_team,
        }
    }

    #[test]
    fn test_status_by_dates_without_student() {
        let d = distribution();
        assert_eq!(registration_status(&d, None, now()), RegistrationStatus::Available);
        assert_eq!(
            registration_status(&d, None, d.start_date - Duration::seconds(1)),
            RegistrationStatus::Future
        );
        assert_eq!(
            registration_status(&d, None, d.end_date + Duration::seconds(1)),
            RegistrationStatus::Closed
        );
    }

    #[test]
    fn test_status_for_students() {
        let d = distribution();
        assert_eq!(
            registration_status(&d, Some(&state(150, false, false)), now()),
            RegistrationStatus::Available
        );
        assert_eq!(
            registration_status(&d, Some(&state(99, false, false)), now()),
            RegistrationStatus::Unavailable
        );
        assert_eq!(
            registration_status(&d, Some(&state(150, true, false)), now()),
            RegistrationStatus::Completed
        );
        assert_eq!(
            registration_status(&d, Some(&state(150, true, true)), now()),
            RegistrationStatus::Distributed
        );
    }

    #[test]
    fn test_membership_outlives_window() {
        let d = distribution();
        let after = d.end_date + Duration::days(30);
        assert_eq!(
            registration_status(&d, Some(&state(0, true, true)), after),
            RegistrationStatus::Distributed
        );
        assert_eq!(
            registration_status(&d, Some(&state(500, false, false)), after),
            RegistrationStatus::Closed
        );
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let mut d = distribution();
        assert!(d.validate().is_ok());

        d.end_date = d.start_date;
        assert!(d.validate().is_err());

        let mut d = distribution();
        d.min_team_size = 5;
        assert!(d.validate().is_err());

        let mut d = distribution();
        d.strict_team_size_mode = true;
        d.strict_team_size = 6;
        assert!(d.validate().is_err());

        let mut d = distribution();
        d.name = "   ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_apply_patch_is_atomic() {
        let mut d = distribution();
        let original = d.clone();

        let err = d
            .apply(TeamDistributionPatch {
                name: Some("Renamed".to_string()),
                max_team_size: Some(1),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CourseError::Validation(_)));
        assert_eq!(d, original);

        d.apply(TeamDistributionPatch {
            name: Some("Renamed".to_string()),
            description_url: Some("https://example.org/teams".to_string()),
            max_team_size: Some(5),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(d.name, "Renamed");
        assert_eq!(d.max_team_size, 5);
        assert_eq!(d.description_url.as_deref(), Some("https://example.org/teams"));
    }

    #[test]
    fn test_registration_window() {
        let d = distribution();
        assert!(d.is_registration_open(now()));
        assert!(d.is_registration_open(d.end_date));
        assert!(!d.is_registration_open(d.end_date + Duration::seconds(1)));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&RegistrationStatus::Distributed).unwrap();
        assert_eq!(json, "\"distributed\"");
    }
}
