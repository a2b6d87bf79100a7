//! Step reporting and cancellation for long edits.
//!
//! An edit that walks many faces owns a [`ProgressTracker`] and calls
//! [`ProgressTracker::step`] once per unit of work. The caller's
//! [`ProgressCallback`] sees a [`Progress`] snapshot and returns `false` to
//! stop the edit; from then on every further `step` also returns `false`.
//!
//! ```
//! use mesh_graph::progress::{ProgressCallback, ProgressTracker};
//!
//! let callback: ProgressCallback = Box::new(|p| p.done < 3);
//! let tracker = ProgressTracker::every_step(10);
//!
//! let finished = (0..10)
//!     .take_while(|_| tracker.step(Some(&callback), "faces"))
//!     .count();
//! assert_eq!(finished, 2);
//! assert!(tracker.is_stopped());
//! ```

use std::cell::Cell;
use std::time::{Duration, Instant};

/// What a callback is told about a running edit.
#[derive(Debug, Clone)]
pub struct Progress {
    pub stage: String,
    pub done: u64,
    pub total: u64,
    pub elapsed: Duration,
}

impl Progress {
    /// Completed share in `0.0..=1.0`; an edit with no steps reports `1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.done.min(self.total) as f64) / (self.total as f64)
        }
    }

    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }
}

/// Return `false` to stop the edit.
pub type ProgressCallback = Box<dyn Fn(&Progress) -> bool>;

/// Counts the steps of one edit and decides when to call back.
///
/// Edits are single-threaded; interior mutability lets the tracker be
/// passed down by shared reference.
#[derive(Debug)]
pub struct ProgressTracker {
    done: Cell<u64>,
    total: u64,
    stopped: Cell<bool>,
    started: Instant,
    last_report: Cell<Option<Instant>>,
    min_gap: Duration,
}

impl ProgressTracker {
    /// Call back after every step.
    pub fn every_step(total: u64) -> Self {
        Self::throttled(total, Duration::ZERO)
    }

    /// Call back at most once per `min_gap`. The first step always reports.
    pub fn throttled(total: u64, min_gap: Duration) -> Self {
        Self {
            done: Cell::new(0),
            total,
            stopped: Cell::new(false),
            started: Instant::now(),
            last_report: Cell::new(None),
            min_gap,
        }
    }

    pub fn done(&self) -> u64 {
        self.done.get()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether a callback has asked to stop.
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    /// Record one finished step and report it. Returns whether to go on.
    pub fn step(&self, callback: Option<&ProgressCallback>, stage: &str) -> bool {
        if self.stopped.get() {
            return false;
        }
        self.done.set(self.done.get() + 1);

        let Some(callback) = callback else {
            return true;
        };
        let now = Instant::now();
        let due = self
            .last_report
            .get()
            .is_none_or(|last| now.duration_since(last) >= self.min_gap);
        if !due {
            return true;
        }
        self.last_report.set(Some(now));

        let progress = Progress {
            stage: stage.to_string(),
            done: self.done.get(),
            total: self.total,
            elapsed: self.started.elapsed(),
        };
        if callback(&progress) {
            true
        } else {
            self.stopped.set(true);
            false
        }
    }
}
