//! The compile entry point.
//!
//! [`compile`] takes recipe and data source text, an include resolver, and
//! a cache store, and produces a binary artifact plus a [`Log`]. The cache
//! is consulted before any parsing: the recipe identity hash covers the
//! flattened include closure, so a hit needs only a lightweight include
//! scan. On a miss the full pipeline runs, and the store is updated only
//! when the log is error-free.
//!
//! ```ignore
//! let result = compile(recipe, data, &resolver, &store);
//! if result.log.good() {
//!     let artifact = result.binary.unwrap();
//! }
//! ```

#![warn(missing_docs)]

pub mod include;
pub mod pipeline;
pub mod source_ast;

pub use include::{IncludeResolver, MapResolver, NoIncludes};
pub use pipeline::{compile, CompileOutcome, CompileResult};
pub use source_ast::SourceAst;
