//! Lexical scope chain for name resolution.
//!
//! Each struct body opens a scope frame holding its nested named
//! declarations; generic instantiation opens a frame holding parameter
//! bindings. Lookup walks from the innermost frame outward, so a nested
//! declaration wins over an enclosing one, and the flat include scope sits
//! at the root. Builtins are not in the chain; the resolver falls back to
//! them when the chain has no match.

use crate::resolved::ResolvedType;
use kiln_common::Ident;
use kiln_recipe_parser::{EnumDecl, StructDecl};
use std::collections::HashMap;

/// A reference to a named type declaration.
#[derive(Debug, Clone, Copy)]
pub enum DeclRef<'a> {
    /// A named struct declaration.
    Struct(&'a StructDecl),
    /// A named enum declaration.
    Enum(&'a EnumDecl),
}

impl<'a> DeclRef<'a> {
    /// A stable address identifying the declaration, used to detect
    /// recursive resolution.
    pub fn addr(&self) -> usize {
        match self {
            DeclRef::Struct(s) => *s as *const StructDecl as usize,
            DeclRef::Enum(e) => *e as *const EnumDecl as usize,
        }
    }
}

/// The result of a scope lookup.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    /// The name refers to a user declaration.
    Decl(DeclRef<'a>),
    /// The name is a bound generic parameter.
    Binding(&'a ResolvedType),
}

/// One frame of the scope chain.
#[derive(Default)]
pub struct Scope<'a> {
    parent: Option<&'a Scope<'a>>,
    decls: HashMap<Ident, DeclRef<'a>>,
    bindings: HashMap<Ident, ResolvedType>,
}

impl<'a> Scope<'a> {
    /// Creates the root frame.
    pub fn root() -> Self {
        Scope::default()
    }

    /// Creates a child frame of this one.
    pub fn child(&'a self) -> Scope<'a> {
        Scope {
            parent: Some(self),
            decls: HashMap::new(),
            bindings: HashMap::new(),
        }
    }

    /// Registers a declaration in this frame. Returns `false` when the name
    /// is already taken at this level; the caller reports the duplicate.
    pub fn insert_decl(&mut self, name: Ident, decl: DeclRef<'a>) -> bool {
        if self.decls.contains_key(&name) {
            return false;
        }
        self.decls.insert(name, decl);
        true
    }

    /// Binds a generic parameter to its resolved argument in this frame.
    pub fn bind(&mut self, name: Ident, ty: ResolvedType) {
        self.bindings.insert(name, ty);
    }

    /// Looks a name up, innermost frame first.
    pub fn lookup(&self, name: Ident) -> Option<Lookup<'_>> {
        if let Some(ty) = self.bindings.get(&name) {
            return Some(Lookup::Binding(ty));
        }
        if let Some(decl) = self.decls.get(&name) {
            return Some(Lookup::Decl(*decl));
        }
        self.parent.and_then(|p| p.lookup(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_common::Interner;
    use kiln_source::Span;

    fn dummy_struct(name: Ident) -> StructDecl {
        StructDecl {
            name: Some(name),
            generics: Vec::new(),
            items: Vec::new(),
            span: Span::DUMMY,
        }
    }

    #[test]
    fn inner_frame_wins() {
        let interner = Interner::new();
        let name = interner.get_or_intern("Point");
        let outer_decl = dummy_struct(name);
        let inner_decl = dummy_struct(name);

        let mut outer = Scope::root();
        assert!(outer.insert_decl(name, DeclRef::Struct(&outer_decl)));
        let mut inner = outer.child();
        assert!(inner.insert_decl(name, DeclRef::Struct(&inner_decl)));

        match inner.lookup(name) {
            Some(Lookup::Decl(d)) => {
                assert_eq!(d.addr(), &inner_decl as *const StructDecl as usize)
            }
            other => panic!("expected decl, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_in_one_frame_rejected() {
        let interner = Interner::new();
        let name = interner.get_or_intern("Point");
        let decl = dummy_struct(name);
        let mut scope = Scope::root();
        assert!(scope.insert_decl(name, DeclRef::Struct(&decl)));
        assert!(!scope.insert_decl(name, DeclRef::Struct(&decl)));
    }

    #[test]
    fn binding_shadows_outer_decl() {
        let interner = Interner::new();
        let name = interner.get_or_intern("T");
        let decl = dummy_struct(name);
        let mut outer = Scope::root();
        outer.insert_decl(name, DeclRef::Struct(&decl));
        let mut inner = outer.child();
        inner.bind(name, ResolvedType::Bool);
        assert!(matches!(
            inner.lookup(name),
            Some(Lookup::Binding(ResolvedType::Bool))
        ));
    }

    #[test]
    fn miss_returns_none() {
        let interner = Interner::new();
        let scope = Scope::root();
        assert!(scope.lookup(interner.get_or_intern("Nope")).is_none());
    }
}
