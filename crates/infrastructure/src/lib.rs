pub mod cross_check_scheduler;
pub mod database;

pub use cross_check_scheduler::{CrossCheckScanReport, CrossCheckScheduler};
pub use database::sqlite::*;
pub use database::DatabaseManager;
