//! Schema-driven binary codec.
//!
//! Encodes a validated data tree into bytes and decodes bytes back into a
//! data tree, both driven by the same [`ResolvedType`]. The payload carries
//! no self-describing tags: structs and tuples are their elements
//! concatenated in declaration order, enums are a minimal-width variant
//! index plus payload, and counts and integers are little-endian.

#![warn(missing_docs)]

mod decode;
mod encode;
mod error;

pub use decode::decode;
pub use encode::encode;
pub use error::CodecError;
