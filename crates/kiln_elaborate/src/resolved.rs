//! Self-contained resolved types.
//!
//! A [`ResolvedType`] is a finite owned tree with every name reference,
//! include, and generic instantiation already expanded. It is the single
//! source of truth for both validation and the binary codec: the encoder
//! and decoder walk the same tree, so the byte layout is implied entirely
//! by the type and never tagged in the payload.

use kiln_common::Ident;

/// A fully resolved recipe type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    /// A type that failed to resolve. The failure is already in the log;
    /// validation skips these subtrees so one bad type reports one error.
    Error,
    /// `bool`, encoded as one byte.
    Bool,
    /// A fixed-width integer primitive.
    Int {
        /// Whether the primitive is signed.
        signed: bool,
        /// Width in bits: 8, 16, 32, or 64.
        bits: u8,
    },
    /// A fixed-width float primitive, 32 or 64 bits.
    Float {
        /// Width in bits: 32 or 64.
        bits: u8,
    },
    /// `str`, encoded as a u32-LE byte count plus UTF-8 bytes.
    Str,
    /// `list<T>`, encoded as a u32-LE count plus elements.
    List(Box<ResolvedType>),
    /// `map<K, V>`, encoded as a u32-LE count plus key/value pairs.
    Map(Box<ResolvedType>, Box<ResolvedType>),
    /// An ordered tuple, elements concatenated in order.
    Tuple(Vec<ResolvedType>),
    /// A struct, members concatenated in declaration order.
    Struct(ResolvedStruct),
    /// An enum, a variant index followed by the variant's payload.
    Enum(ResolvedEnum),
}

/// A resolved struct: ordered members with resolved types.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStruct {
    /// The declared name, absent for anonymous structs.
    pub name: Option<Ident>,
    /// Members in declaration order.
    pub fields: Vec<ResolvedField>,
}

/// One resolved struct member.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    /// The member name.
    pub name: Ident,
    /// The member type.
    pub ty: ResolvedType,
}

/// A resolved enum: ordered variants with resolved payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEnum {
    /// The declared name, absent for anonymous enums.
    pub name: Option<Ident>,
    /// Variants in declaration order.
    pub variants: Vec<ResolvedVariant>,
}

impl ResolvedEnum {
    /// Byte width of the variant index: the smallest of 1, 2, or 4 bytes
    /// that can represent `variants.len() - 1`.
    pub fn index_width(&self) -> usize {
        let max = self.variants.len().saturating_sub(1);
        if max <= u8::MAX as usize {
            1
        } else if max <= u16::MAX as usize {
            2
        } else {
            4
        }
    }

    /// Finds a variant by name, returning its index and the variant.
    pub fn variant(&self, name: Ident) -> Option<(usize, &ResolvedVariant)> {
        self.variants
            .iter()
            .enumerate()
            .find(|(_, v)| v.name == name)
    }
}

/// One resolved enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariant {
    /// The variant name.
    pub name: Ident,
    /// The resolved payload, if the variant declares one.
    pub payload: Option<ResolvedPayload>,
}

/// A resolved variant payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPayload {
    /// An ordered tuple of (optionally labeled) element types.
    Tuple(Vec<ResolvedPayloadElem>),
    /// A struct-like field list.
    Struct(Vec<ResolvedField>),
}

/// One element of a resolved tuple payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPayloadElem {
    /// The optional declared label.
    pub label: Option<Ident>,
    /// The element type.
    pub ty: ResolvedType,
}
