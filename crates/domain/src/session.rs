//! The authenticated user's view of their roles, plus the role predicates
//! used by route guards and navigation filtering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::roles::{CourseRole, RequiredRole};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseInfo {
    pub roles: Vec<CourseRole>,
    pub student_id: Option<i64>,
    pub mentor_id: Option<i64>,
    pub is_expelled: bool,
}

impl CourseInfo {
    pub fn has_role(&self, role: CourseRole) -> bool {
        self.roles.contains(&role)
    }

    pub(crate) fn add_role(&mut self, role: CourseRole) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
            self.roles.sort();
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub github_id: String,
    pub is_admin: bool,
    pub courses: BTreeMap<i64, CourseInfo>,
}

impl Session {
    pub fn new(user_id: i64, github_id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id,
            github_id: github_id.into(),
            is_admin,
            courses: BTreeMap::new(),
        }
    }

    pub fn course(&self, course_id: i64) -> Option<&CourseInfo> {
        self.courses.get(&course_id)
    }

    pub fn course_mut(&mut self, course_id: i64) -> &mut CourseInfo {
        self.courses.entry(course_id).or_default()
    }

    pub fn grant(&mut self, course_id: i64, role: CourseRole) -> &mut Self {
        self.course_mut(course_id).add_role(role);
        self
    }

    pub fn has_course_role(&self, course_id: i64, role: CourseRole) -> bool {
        self.course(course_id)
            .map(|info| info.has_role(role))
            .unwrap_or(false)
    }

    pub fn student_id(&self, course_id: i64) -> Option<i64> {
        self.course(course_id).and_then(|info| info.student_id)
    }

    /// Admins belong to every course; everyone else needs at least one role in it.
    pub fn is_course_member(&self, course_id: i64) -> bool {
        self.is_admin
            || self
                .course(course_id)
                .map(|info| !info.roles.is_empty())
                .unwrap_or(false)
    }

    pub fn satisfies(&self, course_id: i64, required: &[RequiredRole]) -> bool {
        required.iter().any(|role| match role {
            RequiredRole::Admin => self.is_admin,
            RequiredRole::Course(course_role) => self.has_course_role(course_id, *course_role),
        })
    }
}

pub fn is_admin(session: &Session) -> bool {
    session.is_admin
}

pub fn is_student(session: &Session, course_id: i64) -> bool {
    session.has_course_role(course_id, CourseRole::Student)
}

pub fn is_active_student(session: &Session, course_id: i64) -> bool {
    session
        .course(course_id)
        .map(|info| info.has_role(CourseRole::Student) && !info.is_expelled)
        .unwrap_or(false)
}

pub fn is_mentor(session: &Session, course_id: i64) -> bool {
    session.has_course_role(course_id, CourseRole::Mentor)
}

pub fn is_course_manager(session: &Session, course_id: i64) -> bool {
    session.has_course_role(course_id, CourseRole::Manager)
}

pub fn is_supervisor(session: &Session, course_id: i64) -> bool {
    session.has_course_role(course_id, CourseRole::Supervisor)
}

pub fn is_dementor(session: &Session, course_id: i64) -> bool {
    session.has_course_role(course_id, CourseRole::Dementor)
}
