//! # Fork Ring
//!
//! The shared state of the table: one binary semaphore per fork.
//!
//! Every fork starts **locked** (zero permits). Nothing can be acquired until
//! [`ResourceRing::release_all`] hands out the single permit of each fork, which
//! is the startup barrier. After that each fork toggles between available and
//! locked as philosophers [`acquire`](ResourceRing::acquire) and
//! [`release`](ResourceRing::release) it.
//!
//! Acquired permits are forgotten rather than held as guards, so ownership of a
//! fork is tracked by the caller and returned with an explicit `release`. Each
//! fork also carries a `held` flag; `release` clears it with a single
//! compare-exchange before handing the permit back, so of two racing releases
//! only one can succeed.

use crate::config::ConfigError;
use crate::ring::RingError;
use crate::shutdown::ShutdownSignal;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// N forks arranged in a circle, shared by reference between all philosophers.
#[derive(Debug)]
pub struct ResourceRing {
    forks: Vec<Fork>,
    served: AtomicBool,
}

#[derive(Debug)]
struct Fork {
    permit: Semaphore,
    held: AtomicBool,
}

impl Fork {
    fn locked() -> Self {
        Self {
            permit: Semaphore::new(0),
            held: AtomicBool::new(false),
        }
    }

    fn take(&self) {
        self.held.store(true, Ordering::Release);
    }
}

impl ResourceRing {
    /// Allocates `size` forks, all locked.
    ///
    /// Fails with [`ConfigError::TooFewSeats`] when `size < 2`.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size < 2 {
            return Err(ConfigError::TooFewSeats { seats: size });
        }
        let forks = (0..size).map(|_| Fork::locked()).collect();
        debug!(size, "Fork ring created");
        Ok(Self {
            forks,
            served: AtomicBool::new(false),
        })
    }

    /// Number of forks in the ring.
    pub fn size(&self) -> usize {
        self.forks.len()
    }

    /// Returns true once [`release_all`](Self::release_all) has run.
    pub fn is_served(&self) -> bool {
        self.served.load(Ordering::Acquire)
    }

    /// Makes every fork available by adding its single permit.
    ///
    /// One-shot: a second call returns [`RingError::AlreadyReleased`] and leaves
    /// the permit counts untouched. Philosophers already blocked in `acquire`
    /// are woken as their forks become available.
    pub fn release_all(&self) -> Result<(), RingError> {
        if self
            .served
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RingError::AlreadyReleased);
        }
        for fork in &self.forks {
            fork.permit.add_permits(1);
        }
        info!(forks = self.forks.len(), "All forks released");
        Ok(())
    }

    /// Waits until fork `index` is available, then takes it.
    ///
    /// There is no timeout; see [`acquire_or_shutdown`](Self::acquire_or_shutdown)
    /// for a cancellable wait.
    pub async fn acquire(&self, index: usize) -> Result<(), RingError> {
        let fork = self.fork(index)?;
        let permit = fork
            .permit
            .acquire()
            .await
            .map_err(|_| RingError::Closed { index })?;
        permit.forget();
        fork.take();
        Ok(())
    }

    /// Like [`acquire`](Self::acquire), but gives up with
    /// [`RingError::Cancelled`] once `shutdown` fires.
    ///
    /// A cancelled wait never keeps the fork, so nothing needs releasing. The
    /// signal is checked again once the permit is in hand: a fork freed by a
    /// neighbour that is itself shutting down can win the race against the
    /// signal, and that permit is handed straight back.
    pub async fn acquire_or_shutdown(
        &self,
        index: usize,
        shutdown: &mut ShutdownSignal,
    ) -> Result<(), RingError> {
        if shutdown.is_triggered() {
            return Err(RingError::Cancelled);
        }
        let fork = self.fork(index)?;
        tokio::select! {
            biased;
            _ = shutdown.triggered() => return Err(RingError::Cancelled),
            permit = fork.permit.acquire() => {
                permit.map_err(|_| RingError::Closed { index })?.forget();
            }
        }
        if shutdown.is_triggered() {
            debug!(index, "Fork acquired after shutdown, putting it back");
            fork.permit.add_permits(1);
            return Err(RingError::Cancelled);
        }
        fork.take();
        Ok(())
    }

    /// Returns fork `index` to the table, waking one waiter if any.
    ///
    /// Never blocks. Releasing a fork that nobody holds is refused with
    /// [`RingError::NotHeld`], since a second permit would break mutual exclusion.
    pub fn release(&self, index: usize) -> Result<(), RingError> {
        let fork = self.fork(index)?;
        if fork
            .held
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RingError::NotHeld { index });
        }
        fork.permit.add_permits(1);
        Ok(())
    }

    /// Returns true if fork `index` could be taken right now.
    pub fn is_available(&self, index: usize) -> Result<bool, RingError> {
        Ok(self.fork(index)?.permit.available_permits() > 0)
    }

    fn fork(&self, index: usize) -> Result<&Fork, RingError> {
        self.forks.get(index).ok_or(RingError::UnknownFork {
            index,
            size: self.forks.len(),
        })
    }
}
