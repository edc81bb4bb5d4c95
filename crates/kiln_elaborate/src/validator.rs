//! Structural validation of a data tree against a resolved type.
//!
//! The validator never stops at the first problem: after recording an error
//! it keeps descending into sibling subtrees, so one pass reports as many
//! independent problems as possible. Encoding is gated on the log being
//! error-free, so a partially valid tree never reaches the codec.

use crate::resolved::*;
use kiln_common::{Ident, Interner};
use kiln_data_parser::{DataNode, DataNodeKind, MapEntry};
use kiln_diagnostics::{DiagnosticKind, Log};
use kiln_source::Span;

/// Checks `data` against `ty`, reporting every mismatch to the log.
pub fn validate(data: &DataNode, ty: &ResolvedType, interner: &Interner, log: &Log) {
    let validator = Validator { interner, log };
    validator.check(data, ty);
}

struct Validator<'env> {
    interner: &'env Interner,
    log: &'env Log,
}

impl<'env> Validator<'env> {
    fn error(&self, kind: DiagnosticKind, msg: String, span: Span) {
        self.log.error(kind, msg, span);
    }

    fn shape(&self, msg: String, span: Span) {
        self.error(DiagnosticKind::Shape, msg, span);
    }

    fn check(&self, data: &DataNode, ty: &ResolvedType) {
        match ty {
            // The resolution failure is already reported.
            ResolvedType::Error => {}
            ResolvedType::Bool => self.check_bool(data),
            ResolvedType::Int { signed, bits } => self.check_int(data, *signed, *bits),
            ResolvedType::Float { .. } => self.check_float(data),
            ResolvedType::Str => self.check_str(data),
            ResolvedType::List(elem) => self.check_list(data, elem),
            ResolvedType::Map(key, value) => self.check_map(data, key, value),
            ResolvedType::Tuple(elems) => self.check_tuple(data, elems),
            ResolvedType::Struct(s) => self.check_struct(data, s),
            ResolvedType::Enum(e) => self.check_enum(data, e),
        }
    }

    fn check_bool(&self, data: &DataNode) {
        if let DataNodeKind::Ident {
            name,
            payload: None,
        } = &data.kind
        {
            let text = self.interner.resolve(*name);
            if text == "true" || text == "false" {
                return;
            }
        }
        self.shape("expected `true` or `false`".to_string(), data.span);
    }

    fn check_int(&self, data: &DataNode, signed: bool, bits: u8) {
        let name = int_name(signed, bits);
        match &data.kind {
            DataNodeKind::Int(value) => {
                let (min, max) = int_range(signed, bits);
                if *value < min || *value > max {
                    self.error(
                        DiagnosticKind::Range,
                        format!("value {value} out of range for `{name}`"),
                        data.span,
                    );
                }
            }
            DataNodeKind::Float(_) => {
                self.error(
                    DiagnosticKind::Range,
                    format!("float value where `{name}` expected"),
                    data.span,
                );
            }
            _ => self.shape(format!("expected `{name}` value"), data.span),
        }
    }

    fn check_float(&self, data: &DataNode) {
        match &data.kind {
            // Integer literals convert to floats.
            DataNodeKind::Int(_) | DataNodeKind::Float(_) => {}
            _ => self.shape("expected float value".to_string(), data.span),
        }
    }

    fn check_str(&self, data: &DataNode) {
        if !matches!(data.kind, DataNodeKind::Str(_)) {
            self.shape("expected string value".to_string(), data.span);
        }
    }

    fn check_list(&self, data: &DataNode, elem: &ResolvedType) {
        match &data.kind {
            DataNodeKind::List(items) => {
                for item in items {
                    self.check(item, elem);
                }
            }
            _ => self.shape("expected list value".to_string(), data.span),
        }
    }

    fn check_map(&self, data: &DataNode, key: &ResolvedType, value: &ResolvedType) {
        match &data.kind {
            DataNodeKind::Map(entries) => {
                self.check_duplicate_keys(entries);
                for entry in entries {
                    self.check(&entry.key, key);
                    self.check(&entry.value, value);
                }
            }
            _ => self.shape("expected map value".to_string(), data.span),
        }
    }

    fn check_tuple(&self, data: &DataNode, elems: &[ResolvedType]) {
        match &data.kind {
            DataNodeKind::Tuple(values) => {
                if values.len() != elems.len() {
                    self.error(
                        DiagnosticKind::Arity,
                        format!(
                            "expected {} tuple elements, found {}",
                            elems.len(),
                            values.len()
                        ),
                        data.span,
                    );
                }
                for (val, ty) in values.iter().zip(elems) {
                    self.check(&val.value, ty);
                }
            }
            _ => self.shape("expected tuple value".to_string(), data.span),
        }
    }

    fn check_struct(&self, data: &DataNode, s: &ResolvedStruct) {
        match &data.kind {
            DataNodeKind::Map(entries) => self.check_fields(entries, &s.fields, data.span),
            _ => self.shape("expected map for struct".to_string(), data.span),
        }
    }

    /// Matches map entries against a declared field list: every declared
    /// field needs exactly one entry, and every entry needs a declared
    /// field. Shared by structs and struct-like variant payloads.
    fn check_fields(&self, entries: &[MapEntry], fields: &[ResolvedField], span: Span) {
        for field in fields {
            let mut matched: Option<&MapEntry> = None;
            let mut duplicate: Option<Span> = None;
            for entry in entries {
                if entry_key(entry) == Some(field.name) {
                    if matched.is_some() {
                        duplicate = Some(entry.key.span);
                    } else {
                        matched = Some(entry);
                    }
                }
            }
            let field_name = self.interner.resolve(field.name);
            if let Some(dup_span) = duplicate {
                self.shape(format!("duplicate field `{field_name}`"), dup_span);
            }
            match matched {
                Some(entry) => self.check(&entry.value, &field.ty),
                None => self.shape(format!("missing field `{field_name}`"), span),
            }
        }
        for entry in entries {
            match entry_key(entry) {
                Some(key) => {
                    if !fields.iter().any(|f| f.name == key) {
                        self.shape(
                            format!("unexpected field `{}`", self.interner.resolve(key)),
                            entry.key.span,
                        );
                    }
                }
                None => self.shape("expected field name".to_string(), entry.key.span),
            }
        }
    }

    fn check_enum(&self, data: &DataNode, e: &ResolvedEnum) {
        let DataNodeKind::Ident { name, payload } = &data.kind else {
            self.shape("expected enum variant".to_string(), data.span);
            return;
        };
        let Some((_, variant)) = e.variant(*name) else {
            self.shape(
                format!("no variant `{}`", self.interner.resolve(*name)),
                data.span,
            );
            return;
        };
        match (&variant.payload, payload) {
            (None, None) => {}
            (None, Some(_)) => self.shape(
                format!(
                    "variant `{}` carries no payload",
                    self.interner.resolve(*name)
                ),
                data.span,
            ),
            (Some(_), None) => self.shape(
                format!("variant `{}` expects a payload", self.interner.resolve(*name)),
                data.span,
            ),
            (Some(ResolvedPayload::Tuple(elems)), Some(value)) => {
                self.check_tuple_payload(value, elems);
            }
            (Some(ResolvedPayload::Struct(fields)), Some(value)) => match &value.kind {
                DataNodeKind::Map(entries) => self.check_fields(entries, fields, value.span),
                _ => self.shape("expected map payload".to_string(), value.span),
            },
        }
    }

    fn check_tuple_payload(&self, value: &DataNode, elems: &[ResolvedPayloadElem]) {
        let DataNodeKind::Tuple(values) = &value.kind else {
            self.shape("expected tuple payload".to_string(), value.span);
            return;
        };
        if values.len() != elems.len() {
            self.error(
                DiagnosticKind::Arity,
                format!(
                    "expected {} payload elements, found {}",
                    elems.len(),
                    values.len()
                ),
                value.span,
            );
        }
        for (val, elem) in values.iter().zip(elems) {
            // Labels are positional documentation: only a mismatch between
            // two present labels is an error.
            if let (Some(found), Some(declared)) = (val.label, elem.label) {
                if found != declared {
                    self.shape(
                        format!(
                            "payload label `{}` does not match declared `{}`",
                            self.interner.resolve(found),
                            self.interner.resolve(declared)
                        ),
                        val.span,
                    );
                }
            }
            self.check(&val.value, &elem.ty);
        }
    }

    fn check_duplicate_keys(&self, entries: &[MapEntry]) {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|prior| prior.key == entry.key) {
                let name = match entry_key(entry) {
                    Some(key) => format!("duplicate key `{}`", self.interner.resolve(key)),
                    None => "duplicate key".to_string(),
                };
                self.shape(name, entry.key.span);
            }
        }
    }
}

/// The identifier of a struct-style key, if the entry has one.
fn entry_key(entry: &MapEntry) -> Option<Ident> {
    match &entry.key.kind {
        DataNodeKind::Ident {
            name,
            payload: None,
        } => Some(*name),
        _ => None,
    }
}

fn int_name(signed: bool, bits: u8) -> String {
    format!("{}{}", if signed { 'i' } else { 'u' }, bits)
}

fn int_range(signed: bool, bits: u8) -> (i128, i128) {
    if signed {
        let max = (1i128 << (bits - 1)) - 1;
        (-max - 1, max)
    } else {
        (0, (1i128 << bits) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_root;
    use kiln_data_parser::parse_data;
    use kiln_recipe_parser::parse_recipe;
    use kiln_source::FileId;

    fn run(recipe: &str, data: &str) -> Log {
        let interner = Interner::new();
        let log = Log::new();
        let parsed = parse_recipe(recipe, FileId::from_raw(0), &interner, &log);
        let ty = resolve_root(&parsed.root, &[], &interner, &log);
        let tree = parse_data(data, FileId::from_raw(1), &interner, &log);
        assert!(log.good(), "setup failed: {:?}", log.messages());
        validate(&tree, &ty, &interner, &log);
        log
    }

    fn assert_good(recipe: &str, data: &str) {
        let log = run(recipe, data);
        assert!(
            log.good(),
            "unexpected errors: {:?}",
            log.messages()
                .iter()
                .map(|d| d.message.clone())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn config_example_validates() {
        assert_good(
            "struct Config { width: u32, height: u32, fullscreen: bool }",
            "width: 1024, height: 768, fullscreen: true",
        );
    }

    #[test]
    fn missing_field_is_one_error_naming_it() {
        let log = run("a: u32, b: u32, c: u32", "a: 1, b: 2");
        assert_eq!(log.error_count(), 1);
        let messages = log.messages();
        assert_eq!(messages[0].kind, DiagnosticKind::Shape);
        assert!(messages[0].message.contains("`c`"));
    }

    #[test]
    fn unexpected_field_is_one_error_naming_it() {
        let log = run("a: u32, b: u32, c: u32", "a: 1, b: 2, c: 3, d: 4");
        assert_eq!(log.error_count(), 1);
        assert!(log.messages()[0].message.contains("`d`"));
    }

    #[test]
    fn duplicate_key_is_error_naming_it() {
        let log = run("a: u32", "a: 1, a: 2");
        assert!(!log.good());
        assert!(log
            .messages()
            .iter()
            .any(|d| d.message.contains("duplicate") && d.message.contains("`a`")));
    }

    #[test]
    fn duplicate_field_span_points_at_duplicate_entry() {
        // "a: 1, a: 2" puts the second `a` at byte 6.
        let log = run("a: u32", "a: 1, a: 2");
        let messages = log.messages();
        assert!(messages[0].message.contains("duplicate field `a`"));
        assert_eq!(messages[0].span.start, 6);
        assert_eq!(messages[0].span.end, 7);
    }

    #[test]
    fn int_range_checks() {
        assert_good("v: u8", "v: 255");
        let log = run("v: u8", "v: 256");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Range);
        let log = run("v: u8", "v: -1");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Range);
        assert_good("v: i8", "v: -128");
        assert_good("v: u64", "v: 18446744073709551615");
        assert_good("v: i64", "v: -9223372036854775808");
    }

    #[test]
    fn float_into_integer_is_range_error() {
        let log = run("v: u32", "v: 1.5");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Range);
    }

    #[test]
    fn integer_into_float_is_accepted() {
        assert_good("v: f32", "v: 3");
        assert_good("v: f64", "v: nan");
    }

    #[test]
    fn alternate_literal_spellings() {
        assert_good("v: f64", "v: NaN");
        assert_good("v: f32", "v: .5");
        assert_good("v: i32", "v: +42");
    }

    #[test]
    fn bool_rejects_other_idents() {
        let log = run("v: bool", "v: yes");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Shape);
    }

    #[test]
    fn enum_variant_payload() {
        assert_good(
            "enum Shape { Circle(radius: f32), Square(side: f32) }",
            "Circle(radius: 2.5)",
        );
    }

    #[test]
    fn enum_unlabeled_payload_accepted() {
        assert_good("enum Shape { Circle(radius: f32) }", "Circle(2.5)");
    }

    #[test]
    fn enum_label_mismatch_is_error() {
        let log = run("enum Shape { Circle(radius: f32) }", "Circle(diameter: 5.0)");
        assert!(log.messages()[0].message.contains("diameter"));
    }

    #[test]
    fn enum_unknown_variant_is_error() {
        let log = run("enum Shape { Circle(radius: f32) }", "Triangle");
        assert!(log.messages()[0].message.contains("Triangle"));
    }

    #[test]
    fn enum_payload_arity_mismatch() {
        let log = run("enum Shape { Circle(radius: f32) }", "Circle(1.0, 2.0)");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Arity);
    }

    #[test]
    fn enum_missing_payload_is_error() {
        let log = run("enum Shape { Circle(radius: f32), Dot }", "Circle");
        assert!(log.messages()[0].message.contains("expects a payload"));
    }

    #[test]
    fn enum_struct_payload() {
        assert_good(
            "enum Event { Resize { w: u32, h: u32 }, Quit }",
            "Resize { w: 800, h: 600 }",
        );
    }

    #[test]
    fn bare_variant() {
        assert_good("enum Event { Resize { w: u32, h: u32 }, Quit }", "Quit");
    }

    #[test]
    fn tuple_arity_checked() {
        assert_good("pos: (f32, f32)", "pos: (1.0, 2.0)");
        let log = run("pos: (f32, f32)", "pos: (1.0, 2.0, 3.0)");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Arity);
    }

    #[test]
    fn list_elements_checked() {
        assert_good("vals: list<u8>", "vals: [1, 2, 3]");
        let log = run("vals: list<u8>", "vals: [1, 300]");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Range);
    }

    #[test]
    fn map_keys_and_values_checked() {
        assert_good("names: map<u32, str>", r#"names: {1: "one", 2: "two"}"#);
        let log = run("names: map<u32, str>", r#"names: {x: "one"}"#);
        assert!(!log.good());
    }

    #[test]
    fn errors_do_not_stop_siblings() {
        let log = run("a: u32, b: u32, c: u32", "a: true, b: 1.5, c: [1]");
        assert_eq!(log.error_count(), 3);
    }

    #[test]
    fn string_value() {
        assert_good("title: str", r#"title: "hello""#);
        let log = run("title: str", "title: 7");
        assert_eq!(log.messages()[0].kind, DiagnosticKind::Shape);
    }

    #[test]
    fn nested_struct_validation() {
        assert_good(
            "window: struct { width: u32, height: u32 }",
            "window: { width: 640, height: 480 }",
        );
        let log = run(
            "window: struct { width: u32, height: u32 }",
            "window: { width: 640 }",
        );
        assert!(log.messages()[0].message.contains("`height`"));
    }
}
