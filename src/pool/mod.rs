//! Object recycling for hot allocation paths.
//!
//! A [`Recycler`] keeps released instances on a free list and hands them out
//! again instead of building new ones, cutting allocation churn in tight
//! loops. Recyclers are single-threaded; share them through a
//! [`SharedRecycler`] handle.

mod builder;
mod config;
mod guard;
mod recycler;

pub use builder::RecyclerBuilder;
pub use config::RecyclerConfig;
pub use guard::Pooled;
pub use recycler::{Recycler, Route};

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

/// Shared, single-threaded handle to a recycler.
pub type SharedRecycler<T, A = (), E = Infallible> = Rc<RefCell<Recycler<T, A, E>>>;

/// Wrap a recycler in a [`SharedRecycler`] handle.
pub fn shared<T, A, E>(recycler: Recycler<T, A, E>) -> SharedRecycler<T, A, E> {
    Rc::new(RefCell::new(recycler))
}
