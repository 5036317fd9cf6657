//! Course navigation links and the access rules deciding who sees them.
//!
//! Each link carries a role predicate evaluated against the active course id
//! and an optional predicate over the course itself. Admins see every link;
//! anyone else needs both predicates to hold.

use serde::Serialize;

use crate::entities::Course;
use crate::session::{
    is_active_student, is_admin, is_course_manager, is_dementor, is_mentor, is_student, Session,
};

pub type RoleCheck = fn(&Session, i64) -> bool;
pub type CourseCheck = fn(&Session, &Course) -> bool;

pub type AccessPredicate = Box<dyn Fn(&Session, i64) -> bool + Send + Sync>;
pub type CoursePredicate = Box<dyn Fn(&Session, &Course) -> bool + Send + Sync>;

pub fn any_access() -> AccessPredicate {
    Box::new(|_, _| true)
}

pub fn every(checks: &[RoleCheck]) -> AccessPredicate {
    let checks = checks.to_vec();
    Box::new(move |session, course_id| checks.iter().all(|check| check(session, course_id)))
}

pub fn some(checks: &[RoleCheck]) -> AccessPredicate {
    let checks = checks.to_vec();
    Box::new(move |session, course_id| checks.iter().any(|check| check(session, course_id)))
}

pub fn every_course(checks: &[CourseCheck]) -> CoursePredicate {
    let checks = checks.to_vec();
    Box::new(move |session, course| checks.iter().all(|check| check(session, course)))
}

pub fn is_course_not_completed(_: &Session, course: &Course) -> bool {
    !course.completed
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LinkIcon {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_tone_color: Option<&'static str>,
}

impl LinkIcon {
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            two_tone_color: None,
        }
    }

    const fn colored(name: &'static str, color: &'static str) -> Self {
        Self {
            name,
            two_tone_color: Some(color),
        }
    }
}

pub struct LinkData {
    pub name: &'static str,
    pub icon: LinkIcon,
    pub url: fn(&Course) -> String,
    pub access: AccessPredicate,
    pub course_access: Option<CoursePredicate>,
    pub new_tab: bool,
}

impl LinkData {
    fn new(name: &'static str, icon: LinkIcon, url: fn(&Course) -> String, access: AccessPredicate) -> Self {
        Self {
            name,
            icon,
            url,
            access,
            course_access: None,
            new_tab: false,
        }
    }

    fn with_course_access(mut self, course_access: CoursePredicate) -> Self {
        self.course_access = Some(course_access);
        self
    }

    pub fn is_visible(&self, session: &Session, course: &Course) -> bool {
        is_admin(session)
            || ((self.access)(session, course.id)
                && self
                    .course_access
                    .as_ref()
                    .map_or(true, |course_access| course_access(session, course)))
    }
}

impl std::fmt::Debug for LinkData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkData")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("has_course_access", &self.course_access.is_some())
            .field("new_tab", &self.new_tab)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LinkRenderData {
    pub name: String,
    pub icon: LinkIcon,
    pub url: String,
    pub new_tab: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavigationItem {
    pub label: String,
    pub icon: LinkIcon,
    pub key: String,
}

pub fn auto_test_route(alias: &str) -> String {
    format!("/course/student/auto-test?course={alias}")
}

/// The course menu, in display order.
pub fn course_links() -> Vec<LinkData> {
    vec![
        LinkData::new(
            "Dashboard",
            LinkIcon::plain("DashboardTwoTone"),
            |course| format!("/course/student/dashboard?course={}", course.alias),
            every(&[is_student]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Dashboard",
            LinkIcon::plain("AppstoreOutlined"),
            |course| format!("/course/mentor/dashboard?course={}", course.alias),
            every(&[is_mentor]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Score",
            LinkIcon::colored("FireTwoTone", "#ffa500"),
            |course| format!("/course/score?course={}", course.alias),
            any_access(),
        ),
        LinkData::new(
            "Schedule",
            LinkIcon::colored("CalendarTwoTone", "#eb2f96"),
            |course| format!("/course/schedule?course={}", course.alias),
            any_access(),
        ),
        LinkData::new(
            "My Students",
            LinkIcon::colored("GoldTwoTone", "#7f00ff"),
            |course| format!("/course/mentor/students?course={}", course.alias),
            every(&[is_mentor]),
        ),
        LinkData::new(
            "Cross-Check: Submit",
            LinkIcon::plain("CodeTwoTone"),
            |course| format!("/course/student/cross-check-submit?course={}", course.alias),
            every(&[is_active_student]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Cross-Check: Review",
            LinkIcon::colored("CheckCircleTwoTone", "#f56161"),
            |course| format!("/course/student/cross-check-review?course={}", course.alias),
            every(&[is_active_student]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Interviews",
            LinkIcon::plain("AudioTwoTone"),
            |course| format!("/course/student/interviews?course={}", course.alias),
            every(&[is_student]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Interviews",
            LinkIcon::colored("AudioTwoTone", "#ffa500"),
            |course| format!("/course/mentor/interviews?course={}", course.alias),
            every(&[is_mentor]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Auto-Test",
            LinkIcon::colored("PlayCircleTwoTone", "#7f00ff"),
            |course| auto_test_route(&course.alias),
            some(&[is_active_student, is_course_manager]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Expel/Unassign Student",
            LinkIcon::colored("StopTwoTone", "#ff0000"),
            |course| format!("/course/mentor/expel-student?course={}", course.alias),
            every(&[is_mentor]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Team Distributions",
            LinkIcon::colored("UsergroupAddOutlined", "#7f00ff"),
            |course| format!("/course/team-distributions?course={}", course.alias),
            some(&[is_course_manager, is_active_student, is_dementor]),
        )
        .with_course_access(every_course(&[is_course_not_completed])),
        LinkData::new(
            "Course Statistics",
            LinkIcon::plain("AppstoreOutlined"),
            |course| format!("/course/stats?course={}", course.alias),
            any_access(),
        ),
    ]
}

fn visible_links<'a>(
    links: &'a [LinkData],
    session: &'a Session,
    course: &'a Course,
) -> impl Iterator<Item = &'a LinkData> + 'a {
    links
        .iter()
        .filter(move |link| link.is_visible(session, course))
}

pub fn get_course_links(session: &Session, active_course: Option<&Course>) -> Vec<LinkRenderData> {
    let Some(course) = active_course else {
        return Vec::new();
    };
    let links = course_links();
    visible_links(&links, session, course)
        .map(|link| LinkRenderData {
            name: link.name.to_string(),
            icon: link.icon,
            url: (link.url)(course),
            new_tab: link.new_tab,
        })
        .collect()
}

pub fn get_navigation_items(session: &Session, active_course: Option<&Course>) -> Vec<NavigationItem> {
    let Some(course) = active_course else {
        return Vec::new();
    };
    let links = course_links();
    visible_links(&links, session, course)
        .map(|link| NavigationItem {
            label: link.name.to_string(),
            icon: link.icon,
            key: (link.url)(course),
        })
        .collect()
}
