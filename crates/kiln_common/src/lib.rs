//! Shared foundational types used across the Kiln data compiler.
//!
//! This crate provides interned identifiers, content hashing for cache
//! identity, and the internal error type used for compiler bugs.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{InternalError, KilnResult};
