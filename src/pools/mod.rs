//! Ready-made recyclers for common payload types.

pub mod vec;

pub use vec::{register_vec_pool, vec_recycler, VEC_POOL};
