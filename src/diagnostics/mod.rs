//! # Deadlock Diagnostics
//!
//! The forks themselves carry no owner, so a stuck table would otherwise hang in
//! silence. The [`ActivityBoard`] keeps a per-seat record of which forks are held
//! and which one is awaited, and can build the wait-for graph from it:
//! seat `a` waits for fork `f`, fork `f` is held by seat `b`, so `a -> b`.
//! A cycle in that graph is a deadlock.
//!
//! ## Recording discipline
//!
//! Philosophers record a fork as held only *after* acquiring it, and drop it
//! from the record *before* releasing it. The board therefore never claims a
//! holder that does not actually hold the fork, and every edge it reports is
//! real. Snapshots are taken under one lock, so a reported cycle is a real one.
//!
//! The [`run_watchdog`] task polls the board and logs any cycle it finds.

pub mod watchdog;

pub use watchdog::*;

use crate::model::Phase;
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// What one seat was last seen doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub phase: Phase,
    pub held: Vec<usize>,
    pub waiting_for: Option<usize>,
    waiting_since: Option<Instant>,
}

impl Activity {
    fn idle() -> Self {
        Self {
            phase: Phase::Thinking,
            held: Vec::with_capacity(2),
            waiting_for: None,
            waiting_since: None,
        }
    }

    /// How long the current wait has lasted, if the seat is waiting.
    pub fn waited(&self) -> Option<Duration> {
        self.waiting_since.map(|since| since.elapsed())
    }
}

/// A cycle in the wait-for graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlockReport {
    /// Seats in the cycle, each waiting on a fork held by the next.
    pub seats: Vec<usize>,
    /// `forks[i]` is the fork `seats[i]` is waiting for.
    pub forks: Vec<usize>,
}

impl fmt::Display for DeadlockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (seat, fork)) in self.seats.iter().zip(&self.forks).enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "seat {seat} waits on fork {fork}")?;
        }
        Ok(())
    }
}

/// Shared record of every seat's activity.
#[derive(Debug)]
pub struct ActivityBoard {
    seats: Mutex<Vec<Activity>>,
}

impl ActivityBoard {
    pub fn new(seats: usize) -> Self {
        Self {
            seats: Mutex::new(vec![Activity::idle(); seats]),
        }
    }

    pub fn set_phase(&self, seat: usize, phase: Phase) {
        self.update(seat, |a| a.phase = phase);
    }

    /// Records that `seat` is about to block on `fork`.
    pub fn waiting(&self, seat: usize, fork: usize) {
        self.update(seat, |a| {
            a.waiting_for = Some(fork);
            a.waiting_since = Some(Instant::now());
        });
    }

    /// Records that `seat` now holds `fork`. Call after the acquire succeeded.
    pub fn acquired(&self, seat: usize, fork: usize) {
        self.update(seat, |a| {
            a.waiting_for = None;
            a.waiting_since = None;
            if !a.held.contains(&fork) {
                a.held.push(fork);
            }
        });
    }

    /// Records that `seat` gave up waiting without getting its fork.
    pub fn gave_up(&self, seat: usize) {
        self.update(seat, |a| {
            a.waiting_for = None;
            a.waiting_since = None;
        });
    }

    /// Records that `seat` is letting go of `fork`. Call before the release.
    pub fn releasing(&self, seat: usize, fork: usize) {
        self.update(seat, |a| a.held.retain(|&held| held != fork));
    }

    /// A copy of every seat's record, taken atomically.
    pub fn snapshot(&self) -> Vec<Activity> {
        self.lock().clone()
    }

    /// The seat currently recorded as holding `fork`.
    pub fn holder_of(&self, fork: usize) -> Option<usize> {
        Self::find_holder(&self.lock(), fork)
    }

    /// Number of seats recorded as eating.
    pub fn eating(&self) -> usize {
        self.lock()
            .iter()
            .filter(|a| a.phase == Phase::Eating)
            .count()
    }

    /// Looks for a cycle in the wait-for graph.
    ///
    /// Every seat has at most one outgoing edge (it waits on one fork, which
    /// has at most one holder), so following edges from each seat either ends
    /// or loops.
    pub fn wait_for_cycle(&self) -> Option<DeadlockReport> {
        let seats = self.lock();
        let next = |seat: usize| -> Option<(usize, usize)> {
            let fork = seats.get(seat)?.waiting_for?;
            let holder = Self::find_holder(&seats, fork)?;
            Some((fork, holder))
        };

        for start in 0..seats.len() {
            let mut path: Vec<(usize, usize)> = Vec::new();
            let mut current = start;
            while let Some((fork, holder)) = next(current) {
                if let Some(pos) = path.iter().position(|&(seat, _)| seat == current) {
                    let cycle = &path[pos..];
                    return Some(DeadlockReport {
                        seats: cycle.iter().map(|&(seat, _)| seat).collect(),
                        forks: cycle.iter().map(|&(_, fork)| fork).collect(),
                    });
                }
                path.push((current, fork));
                if path.len() > seats.len() {
                    break;
                }
                current = holder;
            }
        }
        None
    }

    fn find_holder(seats: &[Activity], fork: usize) -> Option<usize> {
        seats.iter().position(|a| a.held.contains(&fork))
    }

    fn update(&self, seat: usize, f: impl FnOnce(&mut Activity)) {
        if let Some(activity) = self.lock().get_mut(seat) {
            f(activity);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Activity>> {
        self.seats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
