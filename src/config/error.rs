//! Error types for table configuration.

use thiserror::Error;

/// Errors raised while validating a [`TableConfig`](super::TableConfig).
///
/// All of these are fatal: they are reported before any philosopher is spawned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Fewer than two seats. A single philosopher would pair a fork with itself.
    #[error("At least 2 seats are required, got {seats}")]
    TooFewSeats { seats: usize },

    /// The tick duration is zero.
    #[error("Tick duration must be non-zero")]
    ZeroTick,

    /// The stall warning threshold is zero, which would warn on every poll.
    #[error("Stall warning threshold must be non-zero")]
    ZeroStallAfter,

    /// The watchdog polling interval is zero.
    #[error("Watchdog interval must be non-zero")]
    ZeroWatchdogInterval,

    /// The hold range `[min, max)` contains no value.
    #[error("Hold range [{min}, {max}) is empty")]
    EmptyHoldRange { min: u32, max: u32 },

    /// A seat named for fault injection does not exist.
    #[error("Seat {seat} does not exist at a table of {seats}")]
    UnknownSeat { seat: usize, seats: usize },
}
