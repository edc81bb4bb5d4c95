//! Compiled-artifact cache.
//!
//! A cache entry maps a [`CacheKey`] (flattened recipe identity hash plus
//! data source hash) to the compiled binary. [`CacheStore`] is the
//! key/value boundary; [`MemoryStore`] backs tests and short-lived
//! processes, [`DirStore`] persists one validated artifact file per key.

#![warn(missing_docs)]

mod dir_store;
mod error;
mod key;
mod store;

pub use dir_store::DirStore;
pub use error::CacheError;
pub use key::CacheKey;
pub use store::{CacheStore, MemoryStore};
