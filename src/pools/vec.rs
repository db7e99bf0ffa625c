//! Recycler of bare `Vec<T>` sequences.
//!
//! New vectors start empty, reused ones are handed out as they are, and
//! every released vector is cleared (keeping its capacity) before it goes
//! back on the free list.

use crate::error::Result;
use crate::pool::{Recycler, RecyclerBuilder, RecyclerConfig, SharedRecycler};
use crate::registry::Registry;

/// Conventional registry name for a vec recycler.
pub const VEC_POOL: &str = "VecPool";

fn vec_builder<T: 'static>() -> RecyclerBuilder<Vec<T>> {
    Recycler::builder()
        .allocate(|()| Vec::new())
        .renew(|(), _| {})
        .dispose(|v: &mut Vec<T>| v.clear())
}

/// Standalone vec recycler.
pub fn vec_recycler<T: 'static>(config: RecyclerConfig) -> Result<Recycler<Vec<T>>> {
    vec_builder().config(config).build()
}

/// Create a vec recycler and register it under `name`.
pub fn register_vec_pool<T: 'static>(
    registry: &mut Registry,
    name: &str,
) -> Result<SharedRecycler<Vec<T>>> {
    registry.create_pool(name, vec_builder())
}
