//! Recursive descent parser for recipe source text.
//!
//! The parser consumes the token stream produced by the lexer and builds a
//! [`Recipe`] AST. Errors are reported to the [`Log`]; the parser recovers
//! at commas and closing braces so one malformed declaration does not hide
//! problems in its siblings.

use crate::ast::*;
use crate::lexer::lex;
use crate::token::{RecipeToken, Token};
use kiln_common::{Ident, Interner};
use kiln_diagnostics::{DiagnosticKind, Log};
use kiln_source::{FileId, Span};

/// Parses recipe source text into a [`Recipe`].
///
/// The root type is always coerced to a struct: a bare list of member
/// declarations becomes the members of an anonymous root struct. Syntax
/// errors are reported to the log; the returned AST may be partial.
pub fn parse_recipe(source: &str, file: FileId, interner: &Interner, log: &Log) -> Recipe {
    let tokens = lex(source, file, log);
    let mut parser = RecipeParser {
        tokens,
        pos: 0,
        source,
        file,
        interner,
        log,
    };
    parser.parse_recipe()
}

struct RecipeParser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    file: FileId,
    interner: &'src Interner,
    log: &'src Log,
}

impl<'src> RecipeParser<'src> {
    // ========================================================================
    // Primitive operations
    // ========================================================================

    fn current(&self) -> RecipeToken {
        self.tokens[self.pos].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    fn at(&self, kind: RecipeToken) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.current() == RecipeToken::Eof
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: RecipeToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: RecipeToken, what: &str) {
        if !self.eat(kind) {
            self.expected(what);
        }
    }

    fn expect_ident(&mut self) -> Ident {
        if self.at(RecipeToken::Identifier) {
            let ident = self.interner.get_or_intern(self.current_text());
            self.advance();
            ident
        } else {
            self.expected("identifier");
            self.interner.get_or_intern("<missing>")
        }
    }

    fn peek_is(&self, kind: RecipeToken) -> bool {
        self.pos + 1 < self.tokens.len() && self.tokens[self.pos + 1].kind == kind
    }

    fn error(&self, msg: &str) {
        self.log
            .error(DiagnosticKind::Syntax, msg, self.current_span());
    }

    fn expected(&self, what: &str) {
        let actual = if self.at_eof() {
            "end of input".to_string()
        } else {
            format!("'{}'", self.current_text())
        };
        self.error(&format!("expected {what}, found {actual}"));
    }

    // ========================================================================
    // Top level
    // ========================================================================

    fn parse_recipe(&mut self) -> Recipe {
        let start = self.current_span();
        let mut includes = Vec::new();

        while self.at(RecipeToken::Include) {
            let inc_start = self.current_span();
            self.advance();
            let name = self.expect_ident();
            self.expect(RecipeToken::Semicolon, "';'");
            includes.push(Include {
                name,
                span: inc_start.merge(self.prev_span()),
            });
        }

        let items = self.parse_decl_list(RecipeToken::Eof);
        if !self.at_eof() {
            self.expected("',' or end of file");
        }
        let span = start.merge(self.prev_span());

        Recipe {
            includes,
            root: StructDecl {
                name: None,
                generics: Vec::new(),
                items,
                span,
            },
            span,
        }
    }

    /// Parses a comma-separated declaration list up to (not consuming) `end`.
    fn parse_decl_list(&mut self, end: RecipeToken) -> Vec<Decl> {
        let mut items = Vec::new();
        if self.at(end) {
            return items;
        }
        loop {
            match self.parse_decl() {
                Some(decl) => items.push(decl),
                None => {
                    // Recovery: skip one token and resync at a comma or the end.
                    while !self.at_eof() && !self.at(RecipeToken::Comma) && !self.at(end) {
                        self.advance();
                    }
                }
            }
            if !self.eat(RecipeToken::Comma) {
                break;
            }
        }
        items
    }

    fn parse_decl(&mut self) -> Option<Decl> {
        match self.current() {
            RecipeToken::Struct => self.parse_struct_decl().map(Decl::Struct),
            RecipeToken::Enum => self.parse_enum_decl().map(Decl::Enum),
            RecipeToken::Identifier => self.parse_member().map(Decl::Member),
            _ => {
                self.expected("declaration");
                None
            }
        }
    }

    fn parse_member(&mut self) -> Option<Member> {
        let start = self.current_span();
        let name = self.expect_ident();
        self.expect(RecipeToken::Colon, "':'");
        let ty = self.parse_type()?;
        Some(Member {
            name,
            ty,
            span: start.merge(self.prev_span()),
        })
    }

    // ========================================================================
    // Struct and enum declarations
    // ========================================================================

    /// Parses a named struct declaration: `struct Name<T, ..> { ... }`.
    fn parse_struct_decl(&mut self) -> Option<StructDecl> {
        let start = self.current_span();
        self.expect(RecipeToken::Struct, "'struct'");
        let name = self.expect_ident();
        let generics = self.parse_generic_params();
        let items = self.parse_struct_body();
        Some(StructDecl {
            name: Some(name),
            generics,
            items,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses a named enum declaration: `enum Name { ... }`.
    fn parse_enum_decl(&mut self) -> Option<EnumDecl> {
        let start = self.current_span();
        self.expect(RecipeToken::Enum, "'enum'");
        let name = self.expect_ident();
        let variants = self.parse_enum_body();
        Some(EnumDecl {
            name: Some(name),
            variants,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_generic_params(&mut self) -> Vec<Ident> {
        let mut params = Vec::new();
        if !self.eat(RecipeToken::LeftAngle) {
            return params;
        }
        loop {
            params.push(self.expect_ident());
            if !self.eat(RecipeToken::Comma) {
                break;
            }
        }
        self.expect(RecipeToken::RightAngle, "'>'");
        params
    }

    fn parse_struct_body(&mut self) -> Vec<Decl> {
        self.expect(RecipeToken::LeftBrace, "'{'");
        let items = self.parse_decl_list(RecipeToken::RightBrace);
        self.expect(RecipeToken::RightBrace, "'}'");
        items
    }

    fn parse_enum_body(&mut self) -> Vec<Variant> {
        self.expect(RecipeToken::LeftBrace, "'{'");
        let mut variants = Vec::new();
        if !self.at(RecipeToken::RightBrace) {
            loop {
                match self.parse_variant() {
                    Some(v) => variants.push(v),
                    None => {
                        while !self.at_eof()
                            && !self.at(RecipeToken::Comma)
                            && !self.at(RecipeToken::RightBrace)
                        {
                            self.advance();
                        }
                    }
                }
                if !self.eat(RecipeToken::Comma) {
                    break;
                }
            }
        }
        self.expect(RecipeToken::RightBrace, "'}'");
        variants
    }

    fn parse_variant(&mut self) -> Option<Variant> {
        if !self.at(RecipeToken::Identifier) {
            self.expected("variant name");
            return None;
        }
        let start = self.current_span();
        let name = self.expect_ident();

        let payload = if self.at(RecipeToken::LeftParen) {
            Some(VariantPayload::Tuple(self.parse_tuple_payload()?))
        } else if self.at(RecipeToken::LeftBrace) {
            Some(VariantPayload::Struct(self.parse_struct_body()))
        } else {
            None
        };

        Some(Variant {
            name,
            payload,
            span: start.merge(self.prev_span()),
        })
    }

    /// Parses `( [label:] type, ... )` after a variant name.
    fn parse_tuple_payload(&mut self) -> Option<Vec<PayloadElem>> {
        self.expect(RecipeToken::LeftParen, "'('");
        let mut elems = Vec::new();
        loop {
            let start = self.current_span();
            let label = if self.at(RecipeToken::Identifier) && self.peek_is(RecipeToken::Colon) {
                let label = self.expect_ident();
                self.advance(); // ':'
                Some(label)
            } else {
                None
            };
            let ty = self.parse_type()?;
            elems.push(PayloadElem {
                label,
                ty,
                span: start.merge(self.prev_span()),
            });
            if !self.eat(RecipeToken::Comma) {
                break;
            }
        }
        self.expect(RecipeToken::RightParen, "')'");
        Some(elems)
    }

    // ========================================================================
    // Type expressions
    // ========================================================================

    fn parse_type(&mut self) -> Option<TypeExpr> {
        match self.current() {
            RecipeToken::Struct => {
                let start = self.current_span();
                self.advance();
                if self.at(RecipeToken::Identifier) {
                    self.error("inline struct type cannot be named");
                    self.advance();
                }
                let items = self.parse_struct_body();
                Some(TypeExpr::Struct(Box::new(StructDecl {
                    name: None,
                    generics: Vec::new(),
                    items,
                    span: start.merge(self.prev_span()),
                })))
            }
            RecipeToken::Enum => {
                let start = self.current_span();
                self.advance();
                if self.at(RecipeToken::Identifier) {
                    self.error("inline enum type cannot be named");
                    self.advance();
                }
                let variants = self.parse_enum_body();
                Some(TypeExpr::Enum(Box::new(EnumDecl {
                    name: None,
                    variants,
                    span: start.merge(self.prev_span()),
                })))
            }
            RecipeToken::LeftParen => {
                let start = self.current_span();
                self.advance();
                let mut elems = Vec::new();
                loop {
                    elems.push(self.parse_type()?);
                    if !self.eat(RecipeToken::Comma) {
                        break;
                    }
                }
                self.expect(RecipeToken::RightParen, "')'");
                let span = start.merge(self.prev_span());
                if elems.len() < 2 {
                    self.log.error(
                        DiagnosticKind::Syntax,
                        "tuple type requires at least two elements",
                        span,
                    );
                }
                Some(TypeExpr::Tuple { elems, span })
            }
            RecipeToken::Identifier => {
                let start = self.current_span();
                let name = self.expect_ident();
                let mut args = Vec::new();
                if self.eat(RecipeToken::LeftAngle) {
                    loop {
                        args.push(self.parse_type()?);
                        if !self.eat(RecipeToken::Comma) {
                            break;
                        }
                    }
                    self.expect(RecipeToken::RightAngle, "'>'");
                }
                Some(TypeExpr::Name {
                    name,
                    args,
                    span: start.merge(self.prev_span()),
                })
            }
            _ => {
                self.expected("type");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> (Recipe, Interner) {
        let interner = Interner::new();
        let log = Log::new();
        let recipe = parse_recipe(source, FileId::from_raw(0), &interner, &log);
        assert!(log.good(), "unexpected errors: {}", fmt_errors(&log));
        (recipe, interner)
    }

    fn parse_err(source: &str) -> Log {
        let interner = Interner::new();
        let log = Log::new();
        parse_recipe(source, FileId::from_raw(0), &interner, &log);
        assert!(!log.good(), "expected errors for {source:?}");
        log
    }

    fn fmt_errors(log: &Log) -> String {
        log.messages()
            .iter()
            .map(|d| d.message.clone())
            .collect::<Vec<_>>()
            .join("; ")
    }

    #[test]
    fn bare_member_list() {
        let (recipe, interner) = parse_ok("width: u32, height: u32, fullscreen: bool");
        assert!(recipe.root.name.is_none());
        assert_eq!(recipe.root.items.len(), 3);
        match &recipe.root.items[0] {
            Decl::Member(m) => {
                assert_eq!(interner.resolve(m.name), "width");
                match &m.ty {
                    TypeExpr::Name { name, args, .. } => {
                        assert_eq!(interner.resolve(*name), "u32");
                        assert!(args.is_empty());
                    }
                    other => panic!("expected name type, got {other:?}"),
                }
            }
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn empty_source_is_empty_root() {
        let (recipe, _) = parse_ok("");
        assert!(recipe.root.items.is_empty());
        assert!(recipe.includes.is_empty());
    }

    #[test]
    fn includes_come_first() {
        let (recipe, interner) = parse_ok("include geometry; include colors; width: u32");
        assert_eq!(recipe.includes.len(), 2);
        assert_eq!(interner.resolve(recipe.includes[0].name), "geometry");
        assert_eq!(interner.resolve(recipe.includes[1].name), "colors");
        assert_eq!(recipe.root.items.len(), 1);
    }

    #[test]
    fn named_struct_declaration() {
        let (recipe, interner) =
            parse_ok("struct Config { width: u32, height: u32, fullscreen: bool }");
        assert_eq!(recipe.root.items.len(), 1);
        match &recipe.root.items[0] {
            Decl::Struct(s) => {
                assert_eq!(interner.resolve(s.name.unwrap()), "Config");
                assert!(s.generics.is_empty());
                assert_eq!(s.items.len(), 3);
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn generic_struct_declaration() {
        let (recipe, interner) = parse_ok("struct Box<T> { value: T }");
        match &recipe.root.items[0] {
            Decl::Struct(s) => {
                assert_eq!(s.generics.len(), 1);
                assert_eq!(interner.resolve(s.generics[0]), "T");
            }
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn generic_instantiation() {
        let (recipe, interner) = parse_ok("struct Box<T> { value: T }, b: Box<u32>");
        match &recipe.root.items[1] {
            Decl::Member(m) => match &m.ty {
                TypeExpr::Name { name, args, .. } => {
                    assert_eq!(interner.resolve(*name), "Box");
                    assert_eq!(args.len(), 1);
                }
                other => panic!("expected name type, got {other:?}"),
            },
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn enum_with_payloads() {
        let (recipe, interner) =
            parse_ok("enum Shape { Circle(radius: f32), Square(side: f32), Dot }");
        match &recipe.root.items[0] {
            Decl::Enum(e) => {
                assert_eq!(interner.resolve(e.name.unwrap()), "Shape");
                assert_eq!(e.variants.len(), 3);
                match &e.variants[0].payload {
                    Some(VariantPayload::Tuple(elems)) => {
                        assert_eq!(elems.len(), 1);
                        assert_eq!(interner.resolve(elems[0].label.unwrap()), "radius");
                    }
                    other => panic!("expected tuple payload, got {other:?}"),
                }
                assert!(e.variants[2].payload.is_none());
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn enum_struct_payload() {
        let (recipe, _) = parse_ok("enum Event { Resize { w: u32, h: u32 }, Quit }");
        match &recipe.root.items[0] {
            Decl::Enum(e) => match &e.variants[0].payload {
                Some(VariantPayload::Struct(fields)) => assert_eq!(fields.len(), 2),
                other => panic!("expected struct payload, got {other:?}"),
            },
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn inline_anonymous_struct() {
        let (recipe, _) = parse_ok("window: struct { width: u32, height: u32 }");
        match &recipe.root.items[0] {
            Decl::Member(m) => match &m.ty {
                TypeExpr::Struct(s) => {
                    assert!(s.name.is_none());
                    assert_eq!(s.items.len(), 2);
                }
                other => panic!("expected inline struct, got {other:?}"),
            },
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn tuple_type() {
        let (recipe, _) = parse_ok("pos: (f32, f32, f32)");
        match &recipe.root.items[0] {
            Decl::Member(m) => match &m.ty {
                TypeExpr::Tuple { elems, .. } => assert_eq!(elems.len(), 3),
                other => panic!("expected tuple type, got {other:?}"),
            },
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn nested_generic_args() {
        let (recipe, _) = parse_ok("table: map<str, list<u32>>");
        match &recipe.root.items[0] {
            Decl::Member(m) => match &m.ty {
                TypeExpr::Name { args, .. } => {
                    assert_eq!(args.len(), 2);
                    match &args[1] {
                        TypeExpr::Name { args, .. } => assert_eq!(args.len(), 1),
                        other => panic!("expected name type, got {other:?}"),
                    }
                }
                other => panic!("expected name type, got {other:?}"),
            },
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn missing_colon_is_error() {
        parse_err("width u32");
    }

    #[test]
    fn named_inline_type_is_error() {
        parse_err("window: struct Window { w: u32 }");
    }

    #[test]
    fn include_after_decl_is_error() {
        // `include` after the first declaration is not valid; the identifier
        // `include` is a keyword and cannot start a member.
        parse_err("width: u32, include colors;");
    }

    #[test]
    fn missing_comma_between_declarations_is_error() {
        let interner = Interner::new();
        let log = Log::new();
        let recipe = parse_recipe(
            "struct Box<T> { value: T } b: Box<u8>",
            FileId::from_raw(0),
            &interner,
            &log,
        );
        assert!(!log.good());
        // The declaration before the missing comma still parses.
        assert_eq!(recipe.root.items.len(), 1);
    }

    #[test]
    fn one_element_tuple_type_is_error() {
        parse_err("pos: (u32)");
    }

    #[test]
    fn error_recovery_keeps_siblings() {
        let interner = Interner::new();
        let log = Log::new();
        let recipe = parse_recipe(
            "width: , height: u32",
            FileId::from_raw(0),
            &interner,
            &log,
        );
        assert!(!log.good());
        // The second member survives the first one's error.
        assert_eq!(recipe.root.items.len(), 1);
    }
}
