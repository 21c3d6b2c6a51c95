//! The shared forks.
//!
//! # Main Components
//!
//! - [`ResourceRing`] - N binary semaphores with the startup barrier and pairwise
//!   acquire/release keyed by fork index
//! - [`RingError`] - Errors from fork operations

pub mod core;
pub mod error;

pub use self::core::*;
pub use error::*;
