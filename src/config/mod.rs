//! Table configuration.
//!
//! A [`TableConfig`] is fixed when the table starts; nothing in it can be changed
//! while philosophers are running.

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of seats used by the demo when nothing else is requested.
pub const DEFAULT_SEATS: usize = 16;

/// Settings for one dining table.
///
/// # Example
///
/// ```
/// use dining_table::config::TableConfig;
/// use std::time::Duration;
///
/// let config = TableConfig {
///     seats: 5,
///     tick: Duration::from_millis(10),
///     ..TableConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Number of philosophers, which is also the number of forks.
    pub seats: usize,

    /// Length of one logical tick. Eating lasts a whole number of ticks.
    pub tick: Duration,

    /// Eating duration in ticks, drawn uniformly from `[min, max)` each cycle.
    pub hold_ticks: HoldTicks,

    /// Pause between picking up the first and the second fork.
    ///
    /// Zero in normal operation. A non-zero value widens the window in which
    /// neighbours can interleave, which is how stress tests force contention.
    pub pickup_delay: Duration,

    /// How long a philosopher waits on one fork before logging a stall warning.
    pub stall_after: Duration,

    /// How often the watchdog inspects the wait-for graph.
    pub watchdog_interval: Duration,

    /// Seats that acquire their forks high-index first.
    ///
    /// This breaks the global ordering on purpose and exists only for fault
    /// injection. Leave empty for a deadlock-free table.
    pub reversed_seats: Vec<usize>,
}

/// Half-open range of ticks a philosopher spends eating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldTicks {
    pub min: u32,
    pub max: u32,
}

impl Default for HoldTicks {
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: DEFAULT_SEATS,
            tick: Duration::from_secs(1),
            hold_ticks: HoldTicks::default(),
            pickup_delay: Duration::ZERO,
            stall_after: Duration::from_secs(30),
            watchdog_interval: Duration::from_secs(1),
            reversed_seats: Vec::new(),
        }
    }
}

impl TableConfig {
    /// Creates the default configuration for `seats` philosophers.
    pub fn with_seats(seats: usize) -> Self {
        Self {
            seats,
            ..Self::default()
        }
    }

    /// Checks every setting, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats < 2 {
            return Err(ConfigError::TooFewSeats { seats: self.seats });
        }
        if self.tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        if self.stall_after.is_zero() {
            return Err(ConfigError::ZeroStallAfter);
        }
        if self.watchdog_interval.is_zero() {
            return Err(ConfigError::ZeroWatchdogInterval);
        }
        if self.hold_ticks.min >= self.hold_ticks.max {
            return Err(ConfigError::EmptyHoldRange {
                min: self.hold_ticks.min,
                max: self.hold_ticks.max,
            });
        }
        if let Some(&seat) = self.reversed_seats.iter().find(|&&s| s >= self.seats) {
            return Err(ConfigError::UnknownSeat {
                seat,
                seats: self.seats,
            });
        }
        Ok(())
    }

    /// Returns true if `seat` was configured to acquire high-index first.
    pub fn is_reversed(&self, seat: usize) -> bool {
        self.reversed_seats.contains(&seat)
    }
}
