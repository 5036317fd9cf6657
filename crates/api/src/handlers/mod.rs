pub mod course_tasks;
pub mod health;
pub mod interviews;
pub mod links;
pub mod session;
pub mod team_distribution;
