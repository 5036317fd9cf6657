use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use course_domain::cross_check::{next_transition, CrossCheckTransition};
use course_domain::repositories::CourseTaskRepository;
use course_errors::CourseResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossCheckScanReport {
    /// Tasks moved to `Distributed`.
    pub started: Vec<i64>,
    /// Tasks moved to `Completed`.
    pub finished: Vec<i64>,
}

impl CrossCheckScanReport {
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.finished.is_empty()
    }
}

/// Advances cross-checks whose submission or review window has passed.
pub struct CrossCheckScheduler {
    tasks: Arc<dyn CourseTaskRepository>,
    scan_interval: Duration,
}

impl CrossCheckScheduler {
    pub fn new(tasks: Arc<dyn CourseTaskRepository>, scan_interval: Duration) -> Self {
        Self {
            tasks,
            scan_interval,
        }
    }

    #[instrument(skip(self))]
    pub async fn scan(&self, now: DateTime<Utc>) -> CourseResult<CrossCheckScanReport> {
        let mut report = CrossCheckScanReport::default();

        for task in self.tasks.find_open_cross_checks().await? {
            let Some(transition) = next_transition(&task, now) else {
                continue;
            };
            let moved = self
                .tasks
                .transition_cross_check(task.id, task.cross_check_status, transition.target_status())
                .await?;
            if !moved {
                warn!(task_id = task.id, "cross-check status changed concurrently, skipping");
                continue;
            }
            match transition {
                CrossCheckTransition::Start => report.started.push(task.id),
                CrossCheckTransition::Finish => report.finished.push(task.id),
            }
        }

        if report.is_empty() {
            debug!("no cross-checks to advance");
        } else {
            info!(
                started = report.started.len(),
                finished = report.finished.len(),
                "cross-check scan complete"
            );
        }
        Ok(report)
    }

    /// Scans on every tick until the shutdown signal fires.
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(interval_seconds = self.scan_interval.as_secs(), "cross-check scheduler started");
        let mut ticker = tokio::time::interval(self.scan_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.scan(Utc::now()).await {
                        error!("cross-check scan failed: {e}");
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("cross-check scheduler stopping");
                    break;
                }
            }
        }
    }
}
