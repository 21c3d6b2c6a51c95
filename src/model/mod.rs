//! Plain data shared by philosophers, the table and observers.
//!
//! - [`ResourcePair`] - the two forks a seat needs, in canonical (low, high) order
//! - [`AcquireOrder`] - which of the pair is requested first
//! - [`Phase`] / [`PhaseEvent`] - observable status transitions

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two forks a philosopher needs, normalized so that `low < high`.
///
/// Acquiring `low` before `high` at every seat gives all philosophers one
/// global order over fork indices, so the wait-for graph cannot close a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePair {
    low: usize,
    high: usize,
}

impl ResourcePair {
    /// Normalizes two fork indices into (low, high).
    pub fn new(left: usize, right: usize) -> Self {
        Self {
            low: left.min(right),
            high: left.max(right),
        }
    }

    /// The pair for `seat` at a table of `seats`: its own fork and the one to
    /// its right, `(seat - 1) mod seats`.
    pub fn for_seat(seat: usize, seats: usize) -> Result<Self, ConfigError> {
        if seats < 2 {
            return Err(ConfigError::TooFewSeats { seats });
        }
        if seat >= seats {
            return Err(ConfigError::UnknownSeat { seat, seats });
        }
        let left = seat;
        let right = (seat + seats - 1) % seats;
        Ok(Self::new(left, right))
    }

    pub fn low(&self) -> usize {
        self.low
    }

    pub fn high(&self) -> usize {
        self.high
    }

    /// The forks in the order they are requested under `order`.
    pub fn acquisition(&self, order: AcquireOrder) -> [usize; 2] {
        match order {
            AcquireOrder::LowFirst => [self.low, self.high],
            AcquireOrder::HighFirst => [self.high, self.low],
        }
    }

    pub fn contains(&self, fork: usize) -> bool {
        self.low == fork || self.high == fork
    }
}

impl fmt::Display for ResourcePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Order in which a philosopher requests its two forks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquireOrder {
    /// Lower index first. The only deadlock-free choice.
    #[default]
    LowFirst,
    /// Higher index first. Used to inject a cycle in stress tests.
    HighFirst,
}

/// What a philosopher is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Holding no forks.
    Thinking,
    /// Waiting on one or both forks.
    Hungry,
    /// Holding both forks.
    Eating,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Thinking => "thinking",
            Phase::Hungry => "hungry",
            Phase::Eating => "eating",
        };
        f.write_str(name)
    }
}

/// A status transition reported by one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub seat: usize,
    pub phase: Phase,
}
