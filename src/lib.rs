#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Dining Table
//!
//! > **Deadlock-free fork acquisition for N philosophers sitting in a ring.**
//!
//! N philosophers sit around a table with one fork between each pair of
//! neighbours. To eat, a philosopher needs both of its forks at once. Every
//! philosopher runs the same cycle forever: think, pick up two forks, eat,
//! put them down.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Resource hierarchy, not a global lock
//!
//! A global lock around "pick up both forks" would be deadlock-free but would
//! let only one philosopher eat at a time. Instead each seat normalizes its
//! pair into `(low, high)` and always requests `low` first. Every request then
//! follows one global order over fork indices, and a cycle of waiting seats
//! would need someone to request a higher fork before a lower one.
//!
//! Up to `N / 2` philosophers eat in parallel.
//!
//! ### Known limitation
//!
//! Ordering rules out deadlock, not starvation. Under an adversarial scheduler
//! one seat can keep losing its forks to its neighbours. With Tokio's fair
//! semaphores this does not happen in practice, but it is not prevented.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Forks ([`ring`])
//! [`ResourceRing`](ring::ResourceRing) owns N binary semaphores. They start
//! locked; a one-shot `release_all` opens the table.
//!
//! ### 2. The Actors ([`philosopher`])
//! [`Philosopher`](philosopher::Philosopher) computes its
//! [`ResourcePair`](model::ResourcePair) and runs the cancellable think/eat loop.
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! [`Table`](lifecycle::Table) spawns the philosophers, waits until all are
//! seated, serves the forks, and joins everything on shutdown.
//!
//! ### 4. Diagnostics ([`diagnostics`])
//! [`ActivityBoard`](diagnostics::ActivityBoard) records who holds and who
//! awaits which fork; the watchdog reports cycles in the wait-for graph.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # 16 philosophers, one-second ticks
//! RUST_LOG=info cargo run
//!
//! # 5 philosophers eating in 100ms ticks
//! RUST_LOG=info cargo run -- --seats 5 --tick-ms 100
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod config;
pub mod diagnostics;
pub mod lifecycle;
pub mod model;
pub mod philosopher;
pub mod ring;
pub mod shutdown;
