//! # Philosopher
//!
//! One seat at the table. A philosopher owns its [`ResourcePair`] and repeats
//! the same cycle until shutdown:
//!
//! 1. think (hold nothing)
//! 2. become hungry and pick up both forks, lower index first
//! 3. eat for a random number of ticks
//! 4. go back to thinking and put both forks down, in reverse order
//!
//! Step 2 is where deadlock is prevented. Because every seat requests its
//! lower-indexed fork first, all requests follow one global order and no
//! cycle of waiting seats can form.
//!
//! ## Cancellation
//!
//! The loop checks the [`ShutdownSignal`] at the top of every cycle and races
//! it against each blocking wait. Whatever forks are held when the signal
//! fires are put down before the task returns.
//!
//! ## Observability
//!
//! Transitions to thinking and eating are logged at `info`. If a
//! [`PhaseEvent`] sender is attached, every transition is also sent there.
//! `Eating` is sent only after both forks are held and the following
//! `Thinking` is sent before either fork is released, so an observer never
//! sees two neighbours eating at once.

use crate::config::{ConfigError, HoldTicks, TableConfig};
use crate::diagnostics::ActivityBoard;
use crate::model::{AcquireOrder, Phase, PhaseEvent, ResourcePair};
use crate::ring::{ResourceRing, RingError};
use crate::shutdown::ShutdownSignal;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Barrier};
use tracing::{debug, info, warn};

/// How many times a seat ate before leaving the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meals {
    pub seat: usize,
    pub meals: u64,
}

/// One of the N symmetric actors contending for forks.
pub struct Philosopher {
    seat: usize,
    pair: ResourcePair,
    order: AcquireOrder,
    ring: Arc<ResourceRing>,
    board: Arc<ActivityBoard>,
    tick: Duration,
    hold_ticks: HoldTicks,
    pickup_delay: Duration,
    stall_after: Duration,
    events: Option<mpsc::UnboundedSender<PhaseEvent>>,
}

impl Philosopher {
    /// Seats a philosopher at `seat`, computing its fork pair from the ring size.
    pub fn new(
        seat: usize,
        config: &TableConfig,
        ring: Arc<ResourceRing>,
        board: Arc<ActivityBoard>,
    ) -> Result<Self, ConfigError> {
        let pair = ResourcePair::for_seat(seat, ring.size())?;
        let order = if config.is_reversed(seat) {
            AcquireOrder::HighFirst
        } else {
            AcquireOrder::LowFirst
        };
        info!(seat, low = pair.low(), high = pair.high(), ?order, "Philosopher created");
        Ok(Self {
            seat,
            pair,
            order,
            ring,
            board,
            tick: config.tick,
            hold_ticks: config.hold_ticks,
            pickup_delay: config.pickup_delay,
            stall_after: config.stall_after,
            events: None,
        })
    }

    /// Reports every phase transition to `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<PhaseEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn pair(&self) -> ResourcePair {
        self.pair
    }

    pub fn order(&self) -> AcquireOrder {
        self.order
    }

    /// Runs the think/eat cycle until `shutdown` fires.
    ///
    /// Waits on `seated` first so that contention only starts once every
    /// philosopher exists. Returns the number of meals eaten. Errors only if
    /// the ring rejects an operation, which means the pairing is broken.
    pub async fn run(
        self,
        seated: Arc<Barrier>,
        mut shutdown: ShutdownSignal,
    ) -> Result<Meals, RingError> {
        let seat = self.seat;
        tokio::select! {
            biased;
            _ = shutdown.triggered() => return Ok(Meals { seat, meals: 0 }),
            _ = seated.wait() => {}
        }

        let [first, second] = self.pair.acquisition(self.order);
        let mut meals = 0;
        self.enter(Phase::Thinking);

        while !shutdown.is_triggered() {
            self.enter(Phase::Hungry);
            if !self.pick_up(first, &mut shutdown).await? {
                break;
            }
            if !self.pause(self.pickup_delay, &mut shutdown).await
                || !self.pick_up(second, &mut shutdown).await?
            {
                self.put_down(&[first])?;
                break;
            }
            if shutdown.is_triggered() {
                self.put_down(&[second, first])?;
                break;
            }

            meals += 1;
            self.enter(Phase::Eating);
            let hold = self.hold_duration();
            let finished = self.pause(hold, &mut shutdown).await;

            self.enter(Phase::Thinking);
            self.put_down(&[second, first])?;
            if !finished {
                break;
            }
        }

        self.board.set_phase(seat, Phase::Thinking);
        info!(seat, meals, "Philosopher left the table");
        Ok(Meals { seat, meals })
    }

    /// Blocks until `fork` is held. `Ok(false)` means shutdown came first.
    ///
    /// A wait longer than `stall_after` logs a warning naming the current
    /// holder, then keeps waiting.
    async fn pick_up(&self, fork: usize, shutdown: &mut ShutdownSignal) -> Result<bool, RingError> {
        let seat = self.seat;
        self.board.waiting(seat, fork);
        debug!(seat, fork, "Waiting for fork");

        let acquire = self.ring.acquire_or_shutdown(fork, shutdown);
        tokio::pin!(acquire);
        let result = loop {
            tokio::select! {
                result = &mut acquire => break result,
                _ = tokio::time::sleep(self.stall_after) => {
                    warn!(
                        seat,
                        fork,
                        holder = ?self.board.holder_of(fork),
                        "Still waiting for fork"
                    );
                }
            }
        };

        match result {
            Ok(()) => {
                self.board.acquired(seat, fork);
                debug!(seat, fork, "Picked up fork");
                Ok(true)
            }
            Err(RingError::Cancelled) => {
                self.board.gave_up(seat);
                Ok(false)
            }
            Err(e) => {
                self.board.gave_up(seat);
                Err(e)
            }
        }
    }

    /// Releases `forks` in the given order.
    fn put_down(&self, forks: &[usize]) -> Result<(), RingError> {
        for &fork in forks {
            self.board.releasing(self.seat, fork);
            self.ring.release(fork)?;
            debug!(seat = self.seat, fork, "Put down fork");
        }
        Ok(())
    }

    /// Sleeps for `duration`. Returns false if shutdown interrupted it.
    async fn pause(&self, duration: Duration, shutdown: &mut ShutdownSignal) -> bool {
        if duration.is_zero() {
            return true;
        }
        tokio::select! {
            biased;
            _ = shutdown.triggered() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    fn hold_duration(&self) -> Duration {
        let ticks = rand::thread_rng().gen_range(self.hold_ticks.min..self.hold_ticks.max);
        self.tick * ticks
    }

    fn enter(&self, phase: Phase) {
        let seat = self.seat;
        self.board.set_phase(seat, phase);
        match phase {
            Phase::Hungry => debug!(seat, "Philosopher is hungry"),
            Phase::Thinking => info!(seat, "Philosopher starts thinking"),
            Phase::Eating => info!(seat, "Philosopher starts eating"),
        }
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = events.send(PhaseEvent { seat, phase });
        }
    }
}
