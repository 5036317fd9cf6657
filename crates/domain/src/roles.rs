use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CourseRole {
    Student,
    Mentor,
    Manager,
    Supervisor,
    Dementor,
}

impl CourseRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseRole::Student => "student",
            CourseRole::Mentor => "mentor",
            CourseRole::Manager => "manager",
            CourseRole::Supervisor => "supervisor",
            CourseRole::Dementor => "dementor",
        }
    }
}

impl std::fmt::Display for CourseRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role a route may demand: the global admin role or a role inside the
/// course addressed by the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    Admin,
    Course(CourseRole),
}

impl From<CourseRole> for RequiredRole {
    fn from(role: CourseRole) -> Self {
        RequiredRole::Course(role)
    }
}
