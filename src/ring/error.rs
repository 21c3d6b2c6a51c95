//! Error types for fork operations.

use thiserror::Error;

/// Errors returned by [`ResourceRing`](super::ResourceRing) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RingError {
    /// The index does not name a fork in this ring.
    #[error("Fork {index} is out of range for a ring of {size}")]
    UnknownFork { index: usize, size: usize },

    /// `release_all` was called a second time.
    #[error("Forks have already been released")]
    AlreadyReleased,

    /// A fork was released while nobody held it.
    #[error("Fork {index} released while not held")]
    NotHeld { index: usize },

    /// The fork's semaphore was closed while waiting on it.
    #[error("Fork {index} is closed")]
    Closed { index: usize },

    /// Shutdown was requested while waiting for a fork.
    #[error("Acquisition cancelled by shutdown")]
    Cancelled,
}
