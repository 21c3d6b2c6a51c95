//! # Table Lifecycle & Orchestration
//!
//! This module owns the runtime lifecycle of a dining table: creating the
//! forks, spawning one task per philosopher, gating the start of contention
//! and stopping everything again.
//!
//! **Key Responsibilities:**
//! 1. **Seating** - Construct every philosopher before any of them can eat
//! 2. **Startup Barrier** - Wait until all seats are ready, then release the forks once
//! 3. **Supervision** - Run the deadlock watchdog next to the philosophers
//! 4. **Graceful Shutdown** - Cancel every loop, join every task, report meals
//! 5. **Observability Setup** - Initialize tracing and logging
//!
//! ## Shutdown
//!
//! Philosophers never stop on their own. [`Table::shutdown`] fires the shared
//! shutdown signal; each philosopher notices it at the top of its cycle or
//! while blocked on a fork, puts down what it holds, and returns its meal
//! count. The binary wires this to Ctrl-C via [`Table::run_until_ctrl_c`].

pub mod error;
pub mod table;
pub mod tracing;

pub use error::*;
pub use table::*;
pub use self::tracing::setup_tracing;
