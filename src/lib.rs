//! Single-threaded object recycling.
//!
//! A [`Recycler`] hands out instances through an allocate / renew / dispose
//! lifecycle, reusing released instances instead of building new ones. A
//! [`Registry`] keeps recyclers under unique names for applications that run
//! one pool per object kind.
//!
//! ```
//! use recycler::{Recycler, RecyclerConfig};
//!
//! let mut pool: Recycler<Vec<u8>> = Recycler::builder()
//!     .allocate(|()| Vec::with_capacity(256))
//!     .renew(|(), _| {})
//!     .dispose(|buf| buf.clear())
//!     .config(RecyclerConfig::default())
//!     .build()?;
//!
//! let mut buf = pool.obtain(());
//! buf.extend_from_slice(b"frame");
//! pool.recycle(buf);
//!
//! let buf = pool.obtain(());
//! assert!(buf.is_empty());
//! assert_eq!(pool.allocated_count(), 1);
//! # Ok::<(), recycler::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod pools;
pub mod registry;

pub use error::{Error, Result};
pub use metrics::RecyclerStats;
pub use pool::{Pooled, Recycler, RecyclerBuilder, RecyclerConfig, Route, SharedRecycler};
pub use registry::Registry;
