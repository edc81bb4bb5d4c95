//! Parser for the Kiln recipe (schema) language.
//!
//! A recipe declares the types that data files must conform to: structs,
//! enums, tuples, generic declarations, and references to other named types,
//! preceded by optional `include name;` statements. Parsing yields a
//! [`Recipe`](ast::Recipe) whose root is always a struct, even when the
//! source is a bare list of member declarations.

#![warn(missing_docs)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Decl, EnumDecl, Include, Member, PayloadElem, Recipe, StructDecl, TypeExpr, Variant, VariantPayload};
pub use parser::parse_recipe;
