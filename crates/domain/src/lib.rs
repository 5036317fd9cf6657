pub mod access;
pub mod cross_check;
pub mod entities;
pub mod repositories;
pub mod roles;
pub mod services;
pub mod session;
pub mod team_distribution;

pub use access::{get_course_links, get_navigation_items, LinkData, LinkRenderData, NavigationItem};
pub use course_errors::{CourseError, CourseResult};
pub use cross_check::{is_task_needed_to_finish, is_task_needed_to_start, CrossCheckTransition};
pub use entities::*;
pub use repositories::*;
pub use roles::{CourseRole, RequiredRole};
pub use session::{CourseInfo, Session};
pub use team_distribution::RegistrationStatus;
pub use services::{TeamDistributionDetails, TeamDistributionService, TeamDistributionView};
