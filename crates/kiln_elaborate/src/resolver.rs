//! Name resolution and generic instantiation.
//!
//! Resolution turns the parsed recipe into a [`ResolvedType`]: every name
//! reference is looked up through the scope chain, every generic
//! instantiation is expanded by binding its arguments, and builtins are the
//! fallback when no user declaration matches. A failed subtree reports one
//! diagnostic and resolves to nothing; siblings keep resolving.

use crate::resolved::*;
use crate::scope::{DeclRef, Lookup, Scope};
use kiln_common::{Ident, Interner};
use kiln_diagnostics::{DiagnosticKind, Log};
use kiln_recipe_parser::{Decl, EnumDecl, StructDecl, TypeExpr, VariantPayload};
use kiln_source::Span;

/// Resolves the root type of a recipe.
///
/// `includes` are the roots of the already parsed included recipes; their
/// named declarations merge into one flat top scope with the entry root's
/// own declarations, duplicates reported as errors. When the entry root
/// declares no members and exactly one named non-generic type, that type is
/// the validation root, so a file that is just `struct Config { ... }`
/// validates data against `Config` rather than an empty wrapper.
pub fn resolve_root(
    root: &StructDecl,
    includes: &[&StructDecl],
    interner: &Interner,
    log: &Log,
) -> ResolvedType {
    let mut top = Scope::root();
    for include in includes {
        register_decls(&include.items, &mut top, interner, log);
    }
    register_decls(&root.items, &mut top, interner, log);

    let mut resolver = Resolver {
        interner,
        log,
        active: Vec::new(),
    };

    if let Some(decl) = effective_root(root) {
        match decl {
            Decl::Struct(s) => {
                return ResolvedType::Struct(resolver.resolve_struct_body(
                    s.name,
                    &s.items,
                    &top,
                ))
            }
            Decl::Enum(e) => return ResolvedType::Enum(resolver.resolve_enum_body(e, &top)),
            Decl::Member(_) => {}
        }
    }
    // The root's declarations are already in `top`; resolving the members
    // directly avoids registering them a second time.
    ResolvedType::Struct(ResolvedStruct {
        name: None,
        fields: resolver.resolve_members(&root.items, &top),
    })
}

/// Picks the effective validation root: the single named non-generic
/// declaration of a member-less entry file, if there is one.
fn effective_root(root: &StructDecl) -> Option<&Decl> {
    if root.items.iter().any(|d| matches!(d, Decl::Member(_))) {
        return None;
    }
    let mut named = root.items.iter().filter(|d| d.name().is_some());
    let first = named.next()?;
    if named.next().is_some() {
        return None;
    }
    match first {
        Decl::Struct(s) if s.generics.is_empty() => Some(first),
        Decl::Enum(_) => Some(first),
        _ => None,
    }
}

fn register_decls<'a>(items: &'a [Decl], scope: &mut Scope<'a>, interner: &Interner, log: &Log) {
    for item in items {
        let decl = match item {
            Decl::Struct(s) => DeclRef::Struct(s),
            Decl::Enum(e) => DeclRef::Enum(e),
            Decl::Member(_) => continue,
        };
        let Some(name) = item.name() else { continue };
        if !scope.insert_decl(name, decl) {
            log.error(
                DiagnosticKind::Resolution,
                format!("duplicate declaration of `{}`", interner.resolve(name)),
                item.span(),
            );
        }
    }
}

struct Resolver<'env> {
    interner: &'env Interner,
    log: &'env Log,
    /// Addresses of declarations currently being resolved, for detecting
    /// recursive types.
    active: Vec<usize>,
}

impl<'env> Resolver<'env> {
    fn error(&self, kind: DiagnosticKind, msg: &str, span: Span) {
        self.log.error(kind, msg, span);
    }

    fn resolve_struct_body<'a>(
        &mut self,
        name: Option<Ident>,
        items: &'a [Decl],
        scope: &'a Scope<'a>,
    ) -> ResolvedStruct {
        let mut inner = scope.child();
        register_decls(items, &mut inner, self.interner, self.log);
        ResolvedStruct {
            name,
            fields: self.resolve_members(items, &inner),
        }
    }

    fn resolve_members<'a>(
        &mut self,
        items: &'a [Decl],
        scope: &'a Scope<'a>,
    ) -> Vec<ResolvedField> {
        let mut fields = Vec::new();
        let mut seen: Vec<Ident> = Vec::new();
        for item in items {
            let Decl::Member(member) = item else { continue };
            if seen.contains(&member.name) {
                self.error(
                    DiagnosticKind::Resolution,
                    &format!(
                        "duplicate member `{}`",
                        self.interner.resolve(member.name)
                    ),
                    member.span,
                );
                continue;
            }
            seen.push(member.name);
            let ty = self
                .resolve_type(&member.ty, scope)
                .unwrap_or(ResolvedType::Error);
            fields.push(ResolvedField {
                name: member.name,
                ty,
            });
        }
        fields
    }

    fn resolve_enum_body<'a>(&mut self, decl: &'a EnumDecl, scope: &'a Scope<'a>) -> ResolvedEnum {
        let mut variants = Vec::new();
        let mut seen: Vec<Ident> = Vec::new();
        for variant in &decl.variants {
            if seen.contains(&variant.name) {
                self.error(
                    DiagnosticKind::Resolution,
                    &format!(
                        "duplicate variant `{}`",
                        self.interner.resolve(variant.name)
                    ),
                    variant.span,
                );
                continue;
            }
            seen.push(variant.name);
            let payload = match &variant.payload {
                None => None,
                Some(VariantPayload::Tuple(elems)) => {
                    let mut resolved = Vec::new();
                    for elem in elems {
                        let ty = self
                            .resolve_type(&elem.ty, scope)
                            .unwrap_or(ResolvedType::Error);
                        resolved.push(ResolvedPayloadElem {
                            label: elem.label,
                            ty,
                        });
                    }
                    Some(ResolvedPayload::Tuple(resolved))
                }
                Some(VariantPayload::Struct(items)) => {
                    let body = self.resolve_struct_body(None, items, scope);
                    Some(ResolvedPayload::Struct(body.fields))
                }
            };
            variants.push(ResolvedVariant {
                name: variant.name,
                payload,
            });
        }
        ResolvedEnum {
            name: decl.name,
            variants,
        }
    }

    fn resolve_type<'a>(&mut self, ty: &'a TypeExpr, scope: &'a Scope<'a>) -> Option<ResolvedType> {
        match ty {
            TypeExpr::Struct(s) => {
                Some(ResolvedType::Struct(self.resolve_struct_body(
                    None,
                    &s.items,
                    scope,
                )))
            }
            TypeExpr::Enum(e) => Some(ResolvedType::Enum(self.resolve_enum_body(e, scope))),
            TypeExpr::Tuple { elems, span: _ } => {
                let mut resolved = Vec::with_capacity(elems.len());
                for elem in elems {
                    resolved.push(self.resolve_type(elem, scope)?);
                }
                Some(ResolvedType::Tuple(resolved))
            }
            TypeExpr::Name { name, args, span } => self.resolve_name(*name, args, *span, scope),
        }
    }

    fn resolve_name<'a>(
        &mut self,
        name: Ident,
        args: &'a [TypeExpr],
        span: Span,
        scope: &'a Scope<'a>,
    ) -> Option<ResolvedType> {
        match scope.lookup(name) {
            Some(Lookup::Binding(ty)) => {
                if !args.is_empty() {
                    self.error(
                        DiagnosticKind::Arity,
                        &format!(
                            "type parameter `{}` takes no type arguments",
                            self.interner.resolve(name)
                        ),
                        span,
                    );
                    return None;
                }
                Some(ty.clone())
            }
            Some(Lookup::Decl(decl)) => self.resolve_decl_use(name, decl, args, span, scope),
            None => self.resolve_builtin(name, args, span, scope),
        }
    }

    fn resolve_decl_use<'a>(
        &mut self,
        name: Ident,
        decl: DeclRef<'a>,
        args: &'a [TypeExpr],
        span: Span,
        scope: &'a Scope<'a>,
    ) -> Option<ResolvedType> {
        match decl {
            DeclRef::Struct(s) if s.generics.len() != args.len() => {
                self.error(
                    DiagnosticKind::Arity,
                    &format!(
                        "`{}` takes {} type argument{}, found {}",
                        self.interner.resolve(name),
                        s.generics.len(),
                        if s.generics.len() == 1 { "" } else { "s" },
                        args.len()
                    ),
                    span,
                );
                return None;
            }
            DeclRef::Enum(_) if !args.is_empty() => {
                self.error(
                    DiagnosticKind::Arity,
                    &format!(
                        "enum `{}` takes no type arguments",
                        self.interner.resolve(name)
                    ),
                    span,
                );
                return None;
            }
            _ => {}
        }

        // Arguments are use-site types, resolved in the caller's scope
        // before the recursion guard is armed: `Box<Box<u8>>` nests two
        // instantiations, it does not reach `Box` from inside its own body.
        let mut resolved_args = Vec::with_capacity(args.len());
        for arg in args {
            resolved_args.push(self.resolve_type(arg, scope)?);
        }

        if self.active.contains(&decl.addr()) {
            self.error(
                DiagnosticKind::Resolution,
                &format!("recursive type `{}`", self.interner.resolve(name)),
                span,
            );
            return None;
        }
        self.active.push(decl.addr());
        let result = match decl {
            DeclRef::Struct(s) => {
                if resolved_args.is_empty() {
                    ResolvedType::Struct(self.resolve_struct_body(s.name, &s.items, scope))
                } else {
                    // Bind the resolved arguments over the parameter names
                    // for the body.
                    let mut frame = scope.child();
                    for (param, arg) in s.generics.iter().zip(resolved_args) {
                        frame.bind(*param, arg);
                    }
                    ResolvedType::Struct(self.resolve_struct_body(s.name, &s.items, &frame))
                }
            }
            DeclRef::Enum(e) => ResolvedType::Enum(self.resolve_enum_body(e, scope)),
        };
        self.active.pop();
        Some(result)
    }

    /// Builtin fallback when no user declaration matches a name.
    fn resolve_builtin<'a>(
        &mut self,
        name: Ident,
        args: &'a [TypeExpr],
        span: Span,
        scope: &'a Scope<'a>,
    ) -> Option<ResolvedType> {
        let text = self.interner.resolve(name);
        let expected_args: usize = match text {
            "list" => 1,
            "map" => 2,
            "bool" | "str" | "u8" | "i8" | "u16" | "i16" | "u32" | "i32" | "u64" | "i64"
            | "f32" | "f64" => 0,
            _ => {
                self.error(
                    DiagnosticKind::Resolution,
                    &format!("unknown type `{text}`"),
                    span,
                );
                return None;
            }
        };
        if args.len() != expected_args {
            self.error(
                DiagnosticKind::Arity,
                &format!(
                    "`{text}` takes {expected_args} type argument{}, found {}",
                    if expected_args == 1 { "" } else { "s" },
                    args.len()
                ),
                span,
            );
            return None;
        }
        Some(match text {
            "bool" => ResolvedType::Bool,
            "str" => ResolvedType::Str,
            "u8" => ResolvedType::Int {
                signed: false,
                bits: 8,
            },
            "i8" => ResolvedType::Int {
                signed: true,
                bits: 8,
            },
            "u16" => ResolvedType::Int {
                signed: false,
                bits: 16,
            },
            "i16" => ResolvedType::Int {
                signed: true,
                bits: 16,
            },
            "u32" => ResolvedType::Int {
                signed: false,
                bits: 32,
            },
            "i32" => ResolvedType::Int {
                signed: true,
                bits: 32,
            },
            "u64" => ResolvedType::Int {
                signed: false,
                bits: 64,
            },
            "i64" => ResolvedType::Int {
                signed: true,
                bits: 64,
            },
            "f32" => ResolvedType::Float { bits: 32 },
            "f64" => ResolvedType::Float { bits: 64 },
            "list" => ResolvedType::List(Box::new(self.resolve_type(&args[0], scope)?)),
            "map" => ResolvedType::Map(
                Box::new(self.resolve_type(&args[0], scope)?),
                Box::new(self.resolve_type(&args[1], scope)?),
            ),
            _ => unreachable!(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_recipe_parser::parse_recipe;
    use kiln_source::FileId;

    fn resolve_ok(source: &str) -> (ResolvedType, Interner) {
        let interner = Interner::new();
        let log = Log::new();
        let recipe = parse_recipe(source, FileId::from_raw(0), &interner, &log);
        let resolved = resolve_root(&recipe.root, &[], &interner, &log);
        assert!(
            log.good(),
            "unexpected errors: {:?}",
            log.messages()
                .iter()
                .map(|d| d.message.clone())
                .collect::<Vec<_>>()
        );
        (resolved, interner)
    }

    fn resolve_err(source: &str) -> (ResolvedType, Log) {
        let interner = Interner::new();
        let log = Log::new();
        let recipe = parse_recipe(source, FileId::from_raw(0), &interner, &log);
        let resolved = resolve_root(&recipe.root, &[], &interner, &log);
        assert!(!log.good(), "expected errors for {source:?}");
        (resolved, log)
    }

    fn fields(ty: &ResolvedType) -> &[ResolvedField] {
        match ty {
            ResolvedType::Struct(s) => &s.fields,
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn builtin_members() {
        let (ty, _) = resolve_ok("width: u32, ratio: f64, on: bool, title: str");
        let fields = fields(&ty);
        assert_eq!(fields.len(), 4);
        assert_eq!(
            fields[0].ty,
            ResolvedType::Int {
                signed: false,
                bits: 32
            }
        );
        assert_eq!(fields[1].ty, ResolvedType::Float { bits: 64 });
        assert_eq!(fields[2].ty, ResolvedType::Bool);
        assert_eq!(fields[3].ty, ResolvedType::Str);
    }

    #[test]
    fn named_struct_becomes_effective_root() {
        let (ty, interner) = resolve_ok("struct Config { width: u32, height: u32 }");
        match &ty {
            ResolvedType::Struct(s) => {
                assert_eq!(interner.resolve(s.name.unwrap()), "Config");
                assert_eq!(s.fields.len(), 2);
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn named_enum_becomes_effective_root() {
        let (ty, interner) = resolve_ok("enum Shape { Circle(radius: f32), Square(side: f32) }");
        match &ty {
            ResolvedType::Enum(e) => {
                assert_eq!(interner.resolve(e.name.unwrap()), "Shape");
                assert_eq!(e.variants.len(), 2);
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn members_keep_declared_type_root() {
        // A file with members validates as the anonymous wrapper even when
        // it also declares named types.
        let (ty, _) = resolve_ok("struct Point { x: f32, y: f32 }, origin: Point");
        let fields = fields(&ty);
        assert_eq!(fields.len(), 1);
        assert!(matches!(fields[0].ty, ResolvedType::Struct(_)));
    }

    #[test]
    fn generic_instantiation() {
        let (ty, _) = resolve_ok("struct Box<T> { value: T }, b: Box<u32>");
        let fields = fields(&ty);
        match &fields[0].ty {
            ResolvedType::Struct(s) => {
                assert_eq!(
                    s.fields[0].ty,
                    ResolvedType::Int {
                        signed: false,
                        bits: 32
                    }
                );
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn nested_generic_instantiation() {
        let (ty, _) = resolve_ok("struct Box<T> { value: T }, b: Box<Box<u8>>");
        match &fields(&ty)[0].ty {
            ResolvedType::Struct(outer) => match &outer.fields[0].ty {
                ResolvedType::Struct(inner) => assert_eq!(
                    inner.fields[0].ty,
                    ResolvedType::Int {
                        signed: false,
                        bits: 8
                    }
                ),
                other => panic!("expected struct, got {other:?}"),
            },
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn generic_arity_mismatch_is_one_error() {
        let (_, log) = resolve_err("struct Box<T> { value: T }, b: Box<u32, i32>");
        assert_eq!(log.error_count(), 1);
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Arity);
    }

    #[test]
    fn nested_generic_containers() {
        let (ty, _) = resolve_ok("table: map<str, list<u32>>");
        match &fields(&ty)[0].ty {
            ResolvedType::Map(k, v) => {
                assert_eq!(**k, ResolvedType::Str);
                assert!(matches!(**v, ResolvedType::List(_)));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_resolution_error() {
        let (_, log) = resolve_err("x: Widget");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Resolution);
        assert!(log.messages()[0].message.contains("Widget"));
    }

    #[test]
    fn recursive_type_is_error() {
        let (_, log) = resolve_err("struct Node { next: Node }, root: Node");
        assert!(log
            .messages()
            .iter()
            .any(|d| d.kind == DiagnosticKind::Resolution && d.message.contains("recursive")));
    }

    #[test]
    fn duplicate_member_is_error() {
        let (_, log) = resolve_err("x: u32, x: u32");
        assert!(log.messages()[0].message.contains("duplicate member"));
    }

    #[test]
    fn duplicate_declaration_is_error() {
        let (_, log) = resolve_err("struct A { x: u32 }, struct A { y: u32 }, a: A");
        assert_eq!(log.error_count(), 1);
        assert!(log.messages()[0].message.contains("duplicate declaration"));
    }

    #[test]
    fn nested_declaration_shadows_outer() {
        let (ty, _) = resolve_ok(
            "struct Inner { v: u8 }, \
             outer: struct { struct Inner { v: u16 }, i: Inner }",
        );
        match &fields(&ty)[0].ty {
            ResolvedType::Struct(s) => match &s.fields[0].ty {
                ResolvedType::Struct(inner) => {
                    assert_eq!(
                        inner.fields[0].ty,
                        ResolvedType::Int {
                            signed: false,
                            bits: 16
                        }
                    );
                }
                other => panic!("expected struct, got {other:?}"),
            },
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn include_scope_merges() {
        let interner = Interner::new();
        let log = Log::new();
        let included = parse_recipe(
            "struct Color { r: u8, g: u8, b: u8 }",
            FileId::from_raw(0),
            &interner,
            &log,
        );
        let entry = parse_recipe("background: Color", FileId::from_raw(1), &interner, &log);
        let resolved = resolve_root(&entry.root, &[&included.root], &interner, &log);
        assert!(log.good());
        assert_eq!(fields(&resolved).len(), 1);
    }

    #[test]
    fn include_duplicate_is_error() {
        let interner = Interner::new();
        let log = Log::new();
        let a = parse_recipe("struct C { x: u8 }", FileId::from_raw(0), &interner, &log);
        let b = parse_recipe("struct C { y: u8 }", FileId::from_raw(1), &interner, &log);
        let entry = parse_recipe("c: C", FileId::from_raw(2), &interner, &log);
        resolve_root(&entry.root, &[&a.root, &b.root], &interner, &log);
        assert!(!log.good());
    }
}
