//! Error types for the table supervisor.

use crate::config::ConfigError;
use crate::ring::RingError;
use thiserror::Error;

/// Errors that can occur while starting, running or stopping a table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    /// The configuration was rejected before any philosopher was spawned.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A fork operation failed.
    #[error("Fork error: {0}")]
    Ring(#[from] RingError),

    /// A philosopher task returned an error or panicked.
    #[error("Seat {seat} failed: {reason}")]
    SeatFailed { seat: usize, reason: String },

    /// The watchdog task panicked.
    #[error("Watchdog failed: {0}")]
    Watchdog(String),
}
