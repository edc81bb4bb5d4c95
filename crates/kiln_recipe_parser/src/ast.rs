//! AST node types for the recipe parser.
//!
//! Nodes are immutable once constructed: each grammar production returns a
//! fully built node, and every child is exclusively owned by its parent.
//! References to other named types stay name-based ([`TypeExpr::Name`]) and
//! are resolved later against a scope table, never as pointers baked in
//! during parsing.

use kiln_common::Ident;
use kiln_source::Span;
use serde::{Deserialize, Serialize};

/// A complete recipe compilation unit: include references followed by the
/// root type.
///
/// The root is always a struct. When the source is a bare list of member
/// declarations, they become the members of an anonymous root struct; when
/// it declares named types, those become nested declarations of the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Other recipe sources to merge into scope before resolution.
    pub includes: Vec<Include>,
    /// The root type of the recipe.
    pub root: StructDecl,
    /// The span covering the entire source.
    pub span: Span,
}

/// One `include name;` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Include {
    /// The name handed to the include resolver.
    pub name: Ident,
    /// Source span of the include statement.
    pub span: Span,
}

/// A struct declaration, named or anonymous.
///
/// Named when declared as a member of an enclosing scope; anonymous when
/// used inline as a type expression or as the coerced root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructDecl {
    /// The struct name, absent for anonymous structs.
    pub name: Option<Ident>,
    /// Ordered generic parameter names.
    pub generics: Vec<Ident>,
    /// Ordered declarations in the struct body: members and nested types.
    pub items: Vec<Decl>,
    /// Source span.
    pub span: Span,
}

/// One declaration inside a struct body (or at file level).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Decl {
    /// A nested named struct declaration.
    Struct(StructDecl),
    /// A nested named enum declaration.
    Enum(EnumDecl),
    /// A `name: type` member.
    Member(Member),
}

impl Decl {
    /// Returns the declared name, if any.
    pub fn name(&self) -> Option<Ident> {
        match self {
            Decl::Struct(s) => s.name,
            Decl::Enum(e) => e.name,
            Decl::Member(m) => Some(m.name),
        }
    }

    /// Returns the source span of this declaration.
    pub fn span(&self) -> Span {
        match self {
            Decl::Struct(s) => s.span,
            Decl::Enum(e) => e.span,
            Decl::Member(m) => m.span,
        }
    }
}

/// A struct member: a name and its declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// The member name.
    pub name: Ident,
    /// The declared type.
    pub ty: TypeExpr,
    /// Source span.
    pub span: Span,
}

/// An enum declaration, named or anonymous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDecl {
    /// The enum name, absent for anonymous inline enums.
    pub name: Option<Ident>,
    /// Ordered variants.
    pub variants: Vec<Variant>,
    /// Source span.
    pub span: Span,
}

/// One named alternative of an enum, with an optional payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// The variant name.
    pub name: Ident,
    /// The payload, if the variant declares one.
    pub payload: Option<VariantPayload>,
    /// Source span.
    pub span: Span,
}

/// The payload shape of an enum variant: a tuple of type references or a
/// struct-like field list, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VariantPayload {
    /// An ordered tuple of (optionally labeled) type references.
    Tuple(Vec<PayloadElem>),
    /// A struct-like field list.
    Struct(Vec<Decl>),
}

/// One element of a variant tuple payload, with an optional label.
///
/// `Circle(radius: f32)` labels its single element `radius`; the label is
/// positional documentation and does not change the encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadElem {
    /// The optional element label.
    pub label: Option<Ident>,
    /// The element type.
    pub ty: TypeExpr,
    /// Source span.
    pub span: Span,
}

/// A type expression: what can appear after `:` in a member declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeExpr {
    /// A reference to a named type, possibly with generic arguments.
    /// `u32` has no arguments; `list<u32>` has one.
    Name {
        /// The referenced name.
        name: Ident,
        /// Ordered generic type arguments, empty for a plain reference.
        args: Vec<TypeExpr>,
        /// Source span.
        span: Span,
    },
    /// An anonymous inline struct.
    Struct(Box<StructDecl>),
    /// An anonymous inline enum.
    Enum(Box<EnumDecl>),
    /// An ordered tuple of element types.
    Tuple {
        /// The element types.
        elems: Vec<TypeExpr>,
        /// Source span.
        span: Span,
    },
}

impl TypeExpr {
    /// Returns the source span of this type expression.
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Name { span, .. } => *span,
            TypeExpr::Struct(s) => s.span,
            TypeExpr::Enum(e) => e.span,
            TypeExpr::Tuple { span, .. } => *span,
        }
    }
}
