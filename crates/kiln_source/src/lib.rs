//! Source text management for a Kiln compile session.
//!
//! A session involves several sources: the entry recipe, any included
//! recipes, and the data file. Each gets a [`FileId`] when registered in the
//! [`SourceDb`]; [`Span`]s tie AST nodes and diagnostics back to byte ranges
//! within those sources.

#![warn(missing_docs)]

pub mod file_id;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use source_db::{ResolvedSpan, SourceDb};
pub use source_file::SourceFile;
pub use span::Span;
