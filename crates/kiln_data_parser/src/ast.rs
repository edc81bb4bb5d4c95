//! AST node types for the data parser.
//!
//! Data nodes are untyped at this stage: `true` and an enum variant both
//! parse as [`DataNodeKind::Ident`], and the surrounding recipe type decides
//! what they mean during conformance checking.

use kiln_common::Ident;
use kiln_source::Span;
use serde::{Deserialize, Serialize};

/// One parsed data value with its source location.
///
/// Equality ignores spans so a decoded tree (whose spans are dummies)
/// compares equal to the parsed tree it was encoded from. Floats compare by
/// bit pattern, so NaN equals NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataNode {
    /// The value itself.
    pub kind: DataNodeKind,
    /// Source span, [`Span::DUMMY`] for synthesized nodes.
    pub span: Span,
}

impl DataNode {
    /// Builds a node with a dummy span, for synthesized trees.
    pub fn synthetic(kind: DataNodeKind) -> Self {
        DataNode {
            kind,
            span: Span::DUMMY,
        }
    }
}

impl PartialEq for DataNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// The value alternatives of a data node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DataNodeKind {
    /// An integer literal. Wide enough to hold both the `i64` and `u64`
    /// domains; the recipe type narrows it during validation.
    Int(i128),
    /// A float literal, including `nan`, `inf`, and `-inf`.
    Float(f64),
    /// A string literal, quote escapes already decoded.
    Str(String),
    /// A bare identifier: a boolean or an enum variant, with the variant's
    /// payload value if one was written.
    Ident {
        /// The identifier.
        name: Ident,
        /// The payload following the identifier, if any.
        payload: Option<Box<DataNode>>,
    },
    /// A parenthesized tuple of (optionally labeled) values.
    Tuple(Vec<LabeledValue>),
    /// A bracketed list of values.
    List(Vec<DataNode>),
    /// A braced map of `key: value` entries. The top level of a data file is
    /// a bare map without braces.
    Map(Vec<MapEntry>),
}

impl PartialEq for DataNodeKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataNodeKind::Int(a), DataNodeKind::Int(b)) => a == b,
            (DataNodeKind::Float(a), DataNodeKind::Float(b)) => a.to_bits() == b.to_bits(),
            (DataNodeKind::Str(a), DataNodeKind::Str(b)) => a == b,
            (
                DataNodeKind::Ident {
                    name: an,
                    payload: ap,
                },
                DataNodeKind::Ident {
                    name: bn,
                    payload: bp,
                },
            ) => an == bn && ap == bp,
            (DataNodeKind::Tuple(a), DataNodeKind::Tuple(b)) => a == b,
            (DataNodeKind::List(a), DataNodeKind::List(b)) => a == b,
            (DataNodeKind::Map(a), DataNodeKind::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// One element of a tuple value, with an optional label.
///
/// `Circle(radius: 2.5)` labels its single element; labels are checked
/// against the recipe's payload labels when both sides carry them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledValue {
    /// The optional element label.
    pub label: Option<Ident>,
    /// The element value.
    pub value: DataNode,
    /// Source span.
    pub span: Span,
}

impl PartialEq for LabeledValue {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.value == other.value
    }
}

/// One `key: value` entry of a map.
///
/// Keys are full values: a struct-shaped map uses identifier keys, while a
/// `map<K, V>` literal may key on any value of `K`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapEntry {
    /// The entry key.
    pub key: DataNode,
    /// The entry value.
    pub value: DataNode,
    /// Source span.
    pub span: Span,
}

impl PartialEq for MapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}
