//! Recursive descent parser for data source text.

use crate::ast::*;
use crate::lexer::lex;
use crate::token::{DataToken, Token};
use kiln_common::{Ident, Interner};
use kiln_diagnostics::{DiagnosticKind, Log};
use kiln_source::{FileId, Span};

/// Parses a data file: a bare top-level map of `name: value` entries, or a
/// single bare value.
///
/// Syntax errors are reported to the log; the returned tree may be partial.
pub fn parse_data(source: &str, file: FileId, interner: &Interner, log: &Log) -> DataNode {
    let tokens = lex(source, file, log);
    let mut parser = DataParser {
        tokens,
        pos: 0,
        source,
        file,
        interner,
        log,
    };
    parser.parse_file()
}

/// Parses a single data value, for tests and tools that work with value
/// fragments rather than whole files.
pub fn parse_value(source: &str, file: FileId, interner: &Interner, log: &Log) -> Option<DataNode> {
    let tokens = lex(source, file, log);
    let mut parser = DataParser {
        tokens,
        pos: 0,
        source,
        file,
        interner,
        log,
    };
    let value = parser.parse_value();
    if !parser.at_eof() {
        parser.expected("end of input");
    }
    value
}

struct DataParser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    file: FileId,
    interner: &'src Interner,
    log: &'src Log,
}

impl<'src> DataParser<'src> {
    // ========================================================================
    // Primitive operations
    // ========================================================================

    fn current(&self) -> DataToken {
        self.tokens[self.pos].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    fn at(&self, kind: DataToken) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.current() == DataToken::Eof
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

    fn eat(&mut self, kind: DataToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: DataToken, what: &str) {
        if !self.eat(kind) {
            self.expected(what);
        }
    }

    fn expect_ident(&mut self) -> Ident {
        if self.at(DataToken::Identifier) {
            let ident = self.interner.get_or_intern(self.current_text());
            self.advance();
            ident
        } else {
            self.expected("identifier");
            self.interner.get_or_intern("<missing>")
        }
    }

    fn peek_is(&self, kind: DataToken) -> bool {
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
    // Productions
    // ========================================================================

    /// The top level of a data file is a map without braces, or a single
    /// bare value when the root type is not struct-shaped (an enum value
    /// like `Circle(radius: 2.5)` stands alone).
    fn parse_file(&mut self) -> DataNode {
        let start = self.current_span();
        if self.at_eof() {
            return DataNode {
                kind: DataNodeKind::Map(Vec::new()),
                span: start,
            };
        }
        let mut entries = Vec::new();
        let first_start = self.current_span();
        match self.parse_value() {
            Some(first) => {
                if self.at_eof() {
                    return first;
                }
                self.expect(DataToken::Colon, "':' or end of input");
                match self.parse_value() {
                    Some(value) => entries.push(MapEntry {
                        key: first,
                        value,
                        span: first_start.merge(self.prev_span()),
                    }),
                    None => self.recover_to_comma(DataToken::Eof),
                }
            }
            None => self.recover_to_comma(DataToken::Eof),
        }
        while self.eat(DataToken::Comma) {
            let entry_start = self.current_span();
            match self.parse_entry(entry_start) {
                Some(entry) => entries.push(entry),
                None => self.recover_to_comma(DataToken::Eof),
            }
        }
        if !self.at_eof() {
            self.expected("',' or end of input");
        }
        DataNode {
            kind: DataNodeKind::Map(entries),
            span: start.merge(self.prev_span()),
        }
    }

    /// Skips tokens until a comma or `end`, after a malformed entry.
    fn recover_to_comma(&mut self, end: DataToken) {
        while !self.at_eof() && !self.at(DataToken::Comma) && !self.at(end) {
            self.advance();
        }
    }

    /// Parses comma-separated `key: value` entries up to (not consuming)
    /// `end`.
    fn parse_map_entries(&mut self, end: DataToken) -> Vec<MapEntry> {
        let mut entries = Vec::new();
        if self.at(end) {
            return entries;
        }
        loop {
            let start = self.current_span();
            let entry = self.parse_entry(start);
            match entry {
                Some(entry) => entries.push(entry),
                None => self.recover_to_comma(end),
            }
            if !self.eat(DataToken::Comma) {
                break;
            }
        }
        entries
    }

    fn parse_entry(&mut self, start: Span) -> Option<MapEntry> {
        let key = self.parse_value()?;
        self.expect(DataToken::Colon, "':'");
        let value = self.parse_value()?;
        Some(MapEntry {
            key,
            value,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_value(&mut self) -> Option<DataNode> {
        match self.current() {
            DataToken::Int => self.parse_int(),
            DataToken::Float => self.parse_float(),
            DataToken::Str => self.parse_string(),
            DataToken::Identifier => self.parse_ident_value(),
            DataToken::LeftParen => self.parse_tuple(),
            DataToken::LeftBracket => self.parse_list(),
            DataToken::LeftBrace => self.parse_map(),
            _ => {
                self.expected("value");
                None
            }
        }
    }

    fn parse_int(&mut self) -> Option<DataNode> {
        let span = self.current_span();
        let text = self.current_text();
        let value = match text.parse::<i128>() {
            Ok(value) => value,
            Err(_) => {
                self.error(&format!("integer literal '{text}' is too large"));
                self.advance();
                return None;
            }
        };
        self.advance();
        Some(DataNode {
            kind: DataNodeKind::Int(value),
            span,
        })
    }

    fn parse_float(&mut self) -> Option<DataNode> {
        let span = self.current_span();
        let text = self.current_text();
        let value = if text == "-inf" {
            f64::NEG_INFINITY
        } else {
            match text.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    self.error(&format!("malformed float literal '{text}'"));
                    self.advance();
                    return None;
                }
            }
        };
        self.advance();
        Some(DataNode {
            kind: DataNodeKind::Float(value),
            span,
        })
    }

    fn parse_string(&mut self) -> Option<DataNode> {
        let span = self.current_span();
        let text = self.current_text();
        // Strip the quotes and collapse doubled quotes.
        let inner = &text[1..text.len() - 1];
        let decoded = inner.replace("\"\"", "\"");
        self.advance();
        Some(DataNode {
            kind: DataNodeKind::Str(decoded),
            span,
        })
    }

    /// An identifier in value position: `nan`/`inf`, a boolean, or an enum
    /// variant with an optional payload.
    fn parse_ident_value(&mut self) -> Option<DataNode> {
        let span = self.current_span();
        match self.current_text() {
            "nan" | "NaN" => {
                self.advance();
                return Some(DataNode {
                    kind: DataNodeKind::Float(f64::NAN),
                    span,
                });
            }
            "inf" => {
                self.advance();
                return Some(DataNode {
                    kind: DataNodeKind::Float(f64::INFINITY),
                    span,
                });
            }
            _ => {}
        }
        let name = self.expect_ident();
        let payload = if self.at(DataToken::LeftParen) {
            Some(Box::new(self.parse_tuple()?))
        } else if self.at(DataToken::LeftBrace) {
            Some(Box::new(self.parse_map()?))
        } else {
            None
        };
        Some(DataNode {
            kind: DataNodeKind::Ident { name, payload },
            span: span.merge(self.prev_span()),
        })
    }

    /// Parses `( [label:] value, ... )`.
    fn parse_tuple(&mut self) -> Option<DataNode> {
        let start = self.current_span();
        self.expect(DataToken::LeftParen, "'('");
        let mut elems = Vec::new();
        loop {
            let elem_start = self.current_span();
            let label = if self.at(DataToken::Identifier) && self.peek_is(DataToken::Colon) {
                let label = self.expect_ident();
                self.advance(); // ':'
                Some(label)
            } else {
                None
            };
            let value = self.parse_value()?;
            elems.push(LabeledValue {
                label,
                value,
                span: elem_start.merge(self.prev_span()),
            });
            if !self.eat(DataToken::Comma) {
                break;
            }
        }
        self.expect(DataToken::RightParen, "')'");
        Some(DataNode {
            kind: DataNodeKind::Tuple(elems),
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_list(&mut self) -> Option<DataNode> {
        let start = self.current_span();
        self.expect(DataToken::LeftBracket, "'['");
        let mut elems = Vec::new();
        if !self.at(DataToken::RightBracket) {
            loop {
                elems.push(self.parse_value()?);
                if !self.eat(DataToken::Comma) {
                    break;
                }
            }
        }
        self.expect(DataToken::RightBracket, "']'");
        Some(DataNode {
            kind: DataNodeKind::List(elems),
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_map(&mut self) -> Option<DataNode> {
        let start = self.current_span();
        self.expect(DataToken::LeftBrace, "'{'");
        let entries = self.parse_map_entries(DataToken::RightBrace);
        self.expect(DataToken::RightBrace, "'}'");
        Some(DataNode {
            kind: DataNodeKind::Map(entries),
            span: start.merge(self.prev_span()),
        })
    }
}
