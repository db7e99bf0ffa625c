//! Usage instrumentation for recyclers.
//!
//! A [`Tracker`] rides along with every recycler. Counting only happens while
//! the recycler routes its allocate path through the tracked variant, so
//! toggling instrumentation never touches the free list.

use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Callback invoked with a fresh snapshot whenever tracked stats change.
pub type StatsObserver = Box<dyn FnMut(&RecyclerStats)>;

/// Point-in-time view of a recycler's accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecyclerStats {
    /// Instances ever built by the allocate callback.
    pub allocated: u64,
    /// Instances sitting in the free list.
    pub free: usize,
    /// Instances checked out (`allocated - free`).
    pub used: u64,
    /// Slots of free-list storage currently reserved.
    pub size: usize,
}

impl RecyclerStats {
    /// Build a snapshot, deriving `used` from the other counters.
    ///
    /// `used` saturates at zero: callers may release instances the recycler
    /// never allocated.
    pub fn new(allocated: u64, free: usize, size: usize) -> Self {
        Self {
            allocated,
            free,
            used: allocated.saturating_sub(free as u64),
            size,
        }
    }

    /// Fraction of allocated instances currently checked out (0.0 to 1.0).
    pub fn utilization(&self) -> f64 {
        if self.allocated == 0 {
            0.0
        } else {
            self.used as f64 / self.allocated as f64
        }
    }
}

/// Instrumentation state for one recycler.
#[derive(Default)]
pub struct Tracker {
    /// Allocate-path acquisitions observed while tracking was on
    traced: u64,
    observer: Option<StatsObserver>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocate-path acquisitions recorded.
    #[inline]
    pub fn traced(&self) -> u64 {
        self.traced
    }

    /// Install the stats-changed observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: StatsObserver) {
        self.observer = Some(observer);
    }

    /// Count one allocate-path acquisition and publish `stats`.
    pub fn record_allocation(&mut self, stats: RecyclerStats) {
        self.traced += 1;
        self.publish(stats);
    }

    /// Publish `stats` without counting an acquisition.
    pub fn publish(&mut self, stats: RecyclerStats) {
        trace!(
            traced = self.traced,
            allocated = stats.allocated,
            free = stats.free,
            used = stats.used,
            size = stats.size,
            "recycler stats changed"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer(&stats);
        }
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("traced", &self.traced)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
