//! Periodic deadlock detection.

use super::{ActivityBoard, DeadlockReport};
use crate::shutdown::ShutdownSignal;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Polls `board` every `interval` until shutdown.
///
/// Each distinct cycle is logged once at `error` level. Returns every cycle
/// that was reported.
pub async fn run_watchdog(
    board: Arc<ActivityBoard>,
    interval: Duration,
    mut shutdown: ShutdownSignal,
) -> Vec<DeadlockReport> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut reported: Vec<DeadlockReport> = Vec::new();
    debug!(interval_ms = interval.as_millis() as u64, "Watchdog started");

    loop {
        tokio::select! {
            _ = shutdown.triggered() => break,
            _ = ticker.tick() => {
                let Some(report) = board.wait_for_cycle() else {
                    continue;
                };
                if reported.contains(&report) {
                    continue;
                }
                error!(
                    seats = ?report.seats,
                    forks = ?report.forks,
                    "Deadlock detected: {}",
                    report
                );
                reported.push(report);
            }
        }
    }

    info!(deadlocks = reported.len(), "Watchdog stopped");
    reported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown;

    #[tokio::test]
    async fn reports_each_cycle_once() {
        let board = Arc::new(ActivityBoard::new(2));
        board.acquired(0, 0);
        board.acquired(1, 1);
        board.waiting(0, 1);
        board.waiting(1, 0);

        let (trigger, signal) = shutdown::channel();
        let handle = tokio::spawn(run_watchdog(board, Duration::from_millis(5), signal));

        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.trigger();

        let reports = handle.await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].seats.len(), 2);
    }

    #[tokio::test]
    async fn quiet_board_reports_nothing() {
        let board = Arc::new(ActivityBoard::new(3));
        let (trigger, signal) = shutdown::channel();
        let handle = tokio::spawn(run_watchdog(board, Duration::from_millis(5), signal));

        tokio::time::sleep(Duration::from_millis(30)).await;
        trigger.trigger();
        assert!(handle.await.unwrap().is_empty());
    }
}
