use crate::config::TableConfig;
use crate::diagnostics::{run_watchdog, ActivityBoard, DeadlockReport};
use crate::lifecycle::TableError;
use crate::model::PhaseEvent;
use crate::philosopher::{Meals, Philosopher};
use crate::ring::{ResourceRing, RingError};
use crate::shutdown::{self, ShutdownTrigger};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Barrier};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The supervisor that owns the forks and every philosopher task.
///
/// `Table` is responsible for:
/// - **Lifecycle Management**: spawning one task per seat and joining them all on shutdown
/// - **Startup Barrier**: waiting until every seat is ready, then releasing the forks once
/// - **Diagnostics**: running the deadlock watchdog alongside the philosophers
///
/// # Startup
///
/// Startup is split into explicit steps so tests can control each phase:
///
/// 1. [`Table::start`] validates the config, creates the (locked) ring and spawns
///    the philosophers. Nobody can eat yet.
/// 2. [`Table::wait_seated`] waits until every philosopher is constructed and
///    ready to contend.
/// 3. [`Table::serve`] releases every fork, exactly once.
///
/// [`Table::open`] runs all three.
///
/// # Example
///
/// ```no_run
/// # async fn demo() -> Result<(), dining_table::lifecycle::TableError> {
/// use dining_table::config::TableConfig;
/// use dining_table::lifecycle::Table;
///
/// let table = Table::open(TableConfig::with_seats(5), None).await?;
/// // ... philosophers think and eat ...
/// let summary = table.shutdown().await?;
/// println!("{} meals served", summary.total_meals());
/// # Ok(())
/// # }
/// ```
pub struct Table {
    config: TableConfig,
    ring: Arc<ResourceRing>,
    board: Arc<ActivityBoard>,
    seated: Arc<Barrier>,
    is_seated: bool,
    trigger: ShutdownTrigger,
    philosophers: Vec<JoinHandle<Result<Meals, RingError>>>,
    watchdog: JoinHandle<Vec<DeadlockReport>>,
}

/// What happened at the table, returned by [`Table::shutdown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    /// Meals per seat, indexed by seat.
    pub meals: Vec<Meals>,
    /// Cycles the watchdog reported while the table ran.
    pub deadlocks: Vec<DeadlockReport>,
}

impl TableSummary {
    pub fn total_meals(&self) -> u64 {
        self.meals.iter().map(|m| m.meals).sum()
    }
}

impl Table {
    /// Validates `config` and spawns every philosopher with the forks still locked.
    ///
    /// Must be called from within a Tokio runtime. When `events` is given,
    /// every philosopher reports its phase transitions there.
    pub fn start(
        config: TableConfig,
        events: Option<mpsc::UnboundedSender<PhaseEvent>>,
    ) -> Result<Self, TableError> {
        config.validate()?;
        let seats = config.seats;

        let ring = Arc::new(ResourceRing::new(seats)?);
        let board = Arc::new(ActivityBoard::new(seats));

        // Build every philosopher before spawning any, so a bad seat aborts cleanly.
        let mut diners = Vec::with_capacity(seats);
        for seat in 0..seats {
            let philosopher = Philosopher::new(seat, &config, ring.clone(), board.clone())?;
            diners.push(match &events {
                Some(events) => philosopher.with_events(events.clone()),
                None => philosopher,
            });
        }

        // One party per philosopher plus the supervisor.
        let seated = Arc::new(Barrier::new(seats + 1));
        let (trigger, signal) = shutdown::channel();

        let philosophers = diners
            .into_iter()
            .map(|p| tokio::spawn(p.run(seated.clone(), signal.clone())))
            .collect();
        let watchdog = tokio::spawn(run_watchdog(
            board.clone(),
            config.watchdog_interval,
            signal,
        ));

        info!(seats, reversed = ?config.reversed_seats, "Table set");
        Ok(Self {
            config,
            ring,
            board,
            seated,
            is_seated: false,
            trigger,
            philosophers,
            watchdog,
        })
    }

    /// Starts the table, waits for every seat and serves the forks.
    pub async fn open(
        config: TableConfig,
        events: Option<mpsc::UnboundedSender<PhaseEvent>>,
    ) -> Result<Self, TableError> {
        let mut table = Self::start(config, events)?;
        table.wait_seated().await;
        table.serve()?;
        Ok(table)
    }

    /// Waits until every philosopher has been constructed and is ready to
    /// contend. Returns immediately on later calls.
    pub async fn wait_seated(&mut self) {
        if self.is_seated {
            return;
        }
        self.seated.wait().await;
        self.is_seated = true;
        info!(seats = self.config.seats, "All philosophers seated");
    }

    /// Releases every fork. One-shot: a second call fails with
    /// [`RingError::AlreadyReleased`].
    pub fn serve(&self) -> Result<(), TableError> {
        self.ring.release_all()?;
        Ok(())
    }

    pub fn ring(&self) -> &ResourceRing {
        &self.ring
    }

    pub fn board(&self) -> &ActivityBoard {
        &self.board
    }

    /// Checks the wait-for graph right now.
    pub fn deadlock(&self) -> Option<DeadlockReport> {
        self.board.wait_for_cycle()
    }

    /// Stops every philosopher and the watchdog, then joins them.
    ///
    /// Philosophers put down whatever they hold before exiting, including
    /// ones stuck in a deadlock. All tasks are joined even if one fails; the
    /// first failure is returned.
    pub async fn shutdown(self) -> Result<TableSummary, TableError> {
        info!("Shutting down table...");
        self.trigger.trigger();

        let mut meals = Vec::with_capacity(self.philosophers.len());
        let mut failure = None;
        for (seat, handle) in self.philosophers.into_iter().enumerate() {
            let reason = match handle.await {
                Ok(Ok(summary)) => {
                    meals.push(summary);
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(e) => e.to_string(),
            };
            error!(seat, %reason, "Philosopher task failed");
            if failure.is_none() {
                failure = Some(TableError::SeatFailed { seat, reason });
            }
        }

        let deadlocks = self
            .watchdog
            .await
            .map_err(|e| TableError::Watchdog(e.to_string()))?;

        if let Some(e) = failure {
            return Err(e);
        }

        let summary = TableSummary { meals, deadlocks };
        info!(
            meals = summary.total_meals(),
            deadlocks = summary.deadlocks.len(),
            "Table shutdown complete."
        );
        Ok(summary)
    }

    /// Runs until Ctrl-C, then shuts down.
    pub async fn run_until_ctrl_c(self) -> Result<TableSummary, TableError> {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for Ctrl-C, shutting down");
        }
        self.shutdown().await
    }
}
