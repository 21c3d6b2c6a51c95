//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//! Every log line from a philosopher carries its `seat`, and fork operations
//! carry the `fork` index, so one seat's history can be filtered out of the
//! interleaved output.
//!
//! ## What Gets Traced
//!
//! - **Seating**: each philosopher's fork pair and acquisition order at construction
//! - **Phases**: `starts thinking` and `starts eating` at `info`, `hungry` at `debug`
//! - **Forks**: every wait, pick-up and put-down at `debug`
//! - **Stalls**: a fork wait longer than `stall_after` at `warn`, with the holder
//! - **Deadlocks**: the watchdog logs each wait-for cycle at `error`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Phase transitions only
//! RUST_LOG=info cargo run
//!
//! # Every fork movement
//! RUST_LOG=debug cargo run
//!
//! # Inject a reversed seat and watch the watchdog fire
//! RUST_LOG=info cargo run -- --seats 2 --reverse 1 --pickup-delay-ms 200
//! ```
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Philosopher created seat=3 low=2 high=3 order=LowFirst
//! INFO All philosophers seated seats=16
//! INFO All forks released forks=16
//! INFO Philosopher starts thinking seat=3
//! INFO Philosopher starts eating seat=3
//! ```

/// Initializes the global subscriber. `RUST_LOG` controls verbosity.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // seat/fork fields identify the source
        .compact()
        .init();
}
