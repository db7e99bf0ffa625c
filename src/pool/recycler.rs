//! Free-list recycler with an allocate / renew / dispose lifecycle.
//!
//! `acquire` hands out the most recently released instance after running the
//! renew callback on it, or builds a fresh one with the allocate callback when
//! the free list is empty. Fresh instances are never renewed. `release` runs
//! the dispose callback and pushes the instance back on the stack.
//!
//! Which of the two paths `acquire` takes is held in a [`Route`] that is only
//! rewritten at the empty/non-empty edges of the free list (and when tracking
//! is toggled), then matched on every call.

use std::convert::Infallible;
use std::fmt;

use tracing::debug;

use super::builder::RecyclerBuilder;
use super::config::RecyclerConfig;
use crate::error::Result;
use crate::metrics::{RecyclerStats, Tracker};

pub(crate) type AllocateFn<T, A, E> = Box<dyn FnMut(A) -> std::result::Result<T, E>>;
pub(crate) type RenewFn<T, A, E> = Box<dyn FnMut(A, &mut T) -> std::result::Result<(), E>>;
pub(crate) type DisposeFn<T, E> = Box<dyn FnMut(&mut T) -> std::result::Result<(), E>>;

/// Current target of [`Recycler::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Free list empty: build with the allocate callback.
    Allocate,
    /// Free list empty, instrumentation on: build and record stats.
    AllocateTracked,
    /// Free list non-empty: pop and renew.
    Reuse,
}

impl Route {
    #[inline]
    pub fn is_reuse(self) -> bool {
        matches!(self, Route::Reuse)
    }
}

/// Single-threaded object recycler.
///
/// - `T` is the pooled object type
/// - `A` is the argument forwarded from `acquire` to `allocate`/`renew`
///   (use a tuple for several values)
/// - `E` is the error type of the callbacks
///
/// The free list is a `Vec<T>` used as a stack. Popping never shrinks its
/// storage, so [`storage_len`](Self::storage_len) can stay above
/// [`free_count`](Self::free_count) for the life of the recycler. Call
/// [`compact`](Self::compact) to give that storage back.
pub struct Recycler<T, A = (), E = Infallible> {
    free: Vec<T>,
    allocated: u64,
    route: Route,
    tracking: bool,
    dispose_fresh: bool,
    allocate: AllocateFn<T, A, E>,
    renew: RenewFn<T, A, E>,
    dispose: Option<DisposeFn<T, E>>,
    tracker: Tracker,
}

impl<T: 'static, A: 'static> Recycler<T, A, Infallible> {
    /// Create a recycler from infallible allocate and renew callbacks.
    pub fn new<F, R>(allocate: F, renew: R, config: RecyclerConfig) -> Result<Self>
    where
        F: FnMut(A) -> T + 'static,
        R: FnMut(A, &mut T) + 'static,
    {
        Self::builder()
            .allocate(allocate)
            .renew(renew)
            .config(config)
            .build()
    }

    /// Builder for a recycler whose callbacks cannot fail.
    pub fn builder() -> RecyclerBuilder<T, A, Infallible> {
        RecyclerBuilder::new()
    }
}

impl<T: 'static, A: 'static, E: 'static> Recycler<T, A, E> {
    /// Builder for a recycler whose callbacks return `Result<_, E>`.
    pub fn try_builder() -> RecyclerBuilder<T, A, E> {
        RecyclerBuilder::new()
    }
}

impl<T, A> Recycler<T, A, Infallible> {
    /// [`acquire`](Self::acquire) for recyclers whose callbacks cannot fail.
    #[inline]
    pub fn obtain(&mut self, args: A) -> T {
        match self.acquire(args) {
            Ok(obj) => obj,
            Err(never) => match never {},
        }
    }

    /// [`release`](Self::release) for recyclers whose callbacks cannot fail.
    #[inline]
    pub fn recycle(&mut self, obj: T) {
        match self.release(obj) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

impl<T, A, E> Recycler<T, A, E> {
    pub(crate) fn from_parts(
        free: Vec<T>,
        allocate: AllocateFn<T, A, E>,
        renew: RenewFn<T, A, E>,
        dispose: Option<DisposeFn<T, E>>,
        config: &RecyclerConfig,
    ) -> Self {
        Self {
            free,
            allocated: 0,
            route: if config.tracking {
                Route::AllocateTracked
            } else {
                Route::Allocate
            },
            tracking: config.tracking,
            dispose_fresh: config.dispose_fresh,
            allocate,
            renew,
            dispose,
            tracker: Tracker::new(),
        }
    }

    /// Obtain an instance: reuse the top of the free list (after renewing it
    /// with `args`) or allocate a new one from `args`.
    ///
    /// Callback errors are returned as-is. A failed allocation leaves the
    /// counters untouched; a failed renew puts the instance back on top of
    /// the free list.
    #[inline]
    pub fn acquire(&mut self, args: A) -> std::result::Result<T, E> {
        match self.route {
            Route::Reuse => self.reuse(args),
            Route::Allocate => self.allocate_new(args),
            Route::AllocateTracked => {
                let obj = self.allocate_new(args)?;
                let stats = self.stats();
                self.tracker.record_allocation(stats);
                Ok(obj)
            }
        }
    }

    /// Return an instance for reuse.
    ///
    /// The dispose callback runs first; if it fails the instance is dropped
    /// instead of stored and the error is returned.
    #[inline]
    pub fn release(&mut self, mut obj: T) -> std::result::Result<(), E> {
        if let Some(dispose) = self.dispose.as_mut() {
            dispose(&mut obj)?;
        }
        self.push_free(obj);
        Ok(())
    }

    /// Pop the top free instance without renewing it. Never allocates.
    pub fn pull(&mut self) -> Option<T> {
        self.pop_free()
    }

    /// Drop every free instance without disposing it.
    ///
    /// Storage is kept; the recycler stays usable.
    pub fn drain(&mut self) {
        let drained = self.free.len();
        self.free.clear();
        self.route = self.allocate_route();
        if drained > 0 {
            debug!(drained, allocated = self.allocated, "drained recycler");
        }
    }

    /// Shrink free-list storage down to the live free count.
    pub fn compact(&mut self) {
        self.free.shrink_to_fit();
    }

    /// Turn instrumentation on or off. Only the allocate-path target changes.
    pub fn set_tracking(&mut self, enabled: bool) {
        if self.tracking == enabled {
            return;
        }
        self.tracking = enabled;
        if !self.route.is_reuse() {
            self.route = self.allocate_route();
        }
        debug!(tracking = enabled, "recycler tracking toggled");
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Install a stats-changed observer, called on every tracked allocation.
    pub fn on_stats<F>(&mut self, observer: F)
    where
        F: FnMut(&RecyclerStats) + 'static,
    {
        self.tracker.set_observer(Box::new(observer));
    }

    /// Allocate-path acquisitions counted while tracking was on.
    #[inline]
    pub fn traced(&self) -> u64 {
        self.tracker.traced()
    }

    /// Snapshot of the recycler's counters.
    pub fn stats(&self) -> RecyclerStats {
        RecyclerStats::new(self.allocated, self.free.len(), self.free.capacity())
    }

    /// Instances waiting in the free list.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Lifetime count of successful allocate callbacks.
    #[inline]
    pub fn allocated_count(&self) -> u64 {
        self.allocated
    }

    /// Reserved free-list slots; never below `free_count`.
    #[inline]
    pub fn storage_len(&self) -> usize {
        self.free.capacity()
    }

    #[inline]
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn has_dispose(&self) -> bool {
        self.dispose.is_some()
    }

    #[inline]
    fn allocate_route(&self) -> Route {
        if self.tracking {
            Route::AllocateTracked
        } else {
            Route::Allocate
        }
    }

    #[inline]
    fn allocate_new(&mut self, args: A) -> std::result::Result<T, E> {
        let obj = (self.allocate)(args)?;
        self.allocated += 1;
        Ok(obj)
    }

    #[inline]
    fn reuse(&mut self, args: A) -> std::result::Result<T, E> {
        let Some(mut obj) = self.pop_free() else {
            return self.acquire(args);
        };
        match (self.renew)(args, &mut obj) {
            Ok(()) => Ok(obj),
            Err(e) => {
                self.push_free(obj);
                Err(e)
            }
        }
    }

    #[inline]
    fn pop_free(&mut self) -> Option<T> {
        let obj = self.free.pop();
        if self.free.is_empty() {
            self.route = self.allocate_route();
        }
        obj
    }

    #[inline]
    fn push_free(&mut self, obj: T) {
        self.free.push(obj);
        if self.free.len() == 1 {
            self.route = Route::Reuse;
        }
    }
}

impl<T, A: Default, E> Recycler<T, A, E> {
    /// Pre-warm the pool with `n` freshly allocated instances.
    ///
    /// Fresh instances skip `dispose` unless `dispose_fresh` was configured.
    /// On a callback error the instances built so far stay in the pool.
    /// Storage grows push by push, so `n` is never reserved up front.
    pub fn expand(&mut self, n: usize) -> std::result::Result<(), E> {
        for _ in 0..n {
            let mut obj = self.allocate_new(A::default())?;
            if self.dispose_fresh {
                if let Some(dispose) = self.dispose.as_mut() {
                    dispose(&mut obj)?;
                }
            }
            self.push_free(obj);
        }

        debug!(
            n,
            free = self.free.len(),
            allocated = self.allocated,
            "expanded recycler"
        );
        if self.tracking {
            let stats = self.stats();
            self.tracker.publish(stats);
        }
        Ok(())
    }
}

impl<T, A, E> fmt::Debug for Recycler<T, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recycler")
            .field("free", &self.free.len())
            .field("allocated", &self.allocated)
            .field("route", &self.route)
            .field("tracking", &self.tracking)
            .field("dispose", &self.dispose.is_some())
            .finish()
    }
}
