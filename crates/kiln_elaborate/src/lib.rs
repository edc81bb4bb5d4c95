//! Recipe elaboration: name resolution and data validation.
//!
//! Turns a parsed recipe (with its includes merged into one flat top scope)
//! into a self-contained [`ResolvedType`], then checks a parsed data tree
//! against it. Resolution substitutes generic arguments, rejects recursive
//! types, and pre-registers the builtin primitives; validation walks the
//! data tree accumulating diagnostics without aborting sibling subtrees.

#![warn(missing_docs)]

pub mod resolved;
pub mod resolver;
pub mod scope;
pub mod validator;

pub use resolved::{
    ResolvedEnum, ResolvedField, ResolvedPayload, ResolvedPayloadElem, ResolvedStruct,
    ResolvedType, ResolvedVariant,
};
pub use resolver::resolve_root;
pub use validator::validate;
