//! Time-window checks driving the cross-check lifecycle
//! (`Initial` -> `Distributed` -> `Completed`).
//!
//! The current time is always passed in, so the checks stay pure. A task
//! without the relevant deadline never triggers a transition.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{CourseTask, CrossCheckStatus};

/// The submission window is over and reviews have not been handed out yet.
pub fn is_task_needed_to_start(task: &CourseTask, now: DateTime<Utc>) -> bool {
    task.cross_check_status == CrossCheckStatus::Initial
        && task.student_end_date.is_some_and(|end| now > end)
}

/// Reviews were handed out and the review window is over.
pub fn is_task_needed_to_finish(task: &CourseTask, now: DateTime<Utc>) -> bool {
    task.cross_check_status == CrossCheckStatus::Distributed
        && task.cross_check_end_date.is_some_and(|end| now > end)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CrossCheckTransition {
    Start,
    Finish,
}

impl CrossCheckTransition {
    pub fn target_status(&self) -> CrossCheckStatus {
        match self {
            CrossCheckTransition::Start => CrossCheckStatus::Distributed,
            CrossCheckTransition::Finish => CrossCheckStatus::Completed,
        }
    }
}

pub fn next_transition(task: &CourseTask, now: DateTime<Utc>) -> Option<CrossCheckTransition> {
    if is_task_needed_to_start(task, now) {
        Some(CrossCheckTransition::Start)
    } else if is_task_needed_to_finish(task, now) {
        Some(CrossCheckTransition::Finish)
    } else {
        None
    }
}
