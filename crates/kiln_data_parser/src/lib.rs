//! Parser for the Kiln data (value literal) language.
//!
//! A data file is a bare top-level map of `name: value` entries, or a single
//! bare value when the schema root is not struct-shaped. Values are
//! integers, floats, strings, identifiers (booleans and enum variants,
//! optionally with a payload), tuples, lists, and maps. Parsing yields a
//! [`DataNode`](ast::DataNode) tree; conformance against a recipe is checked
//! later, after resolution.

#![warn(missing_docs)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{DataNode, DataNodeKind, LabeledValue, MapEntry};
pub use parser::{parse_data, parse_value};
