//! Lexical analyzer for data source text.
//!
//! Converts source text into a sequence of [`Token`]s, skipping whitespace,
//! `//` line comments, and nestable `/* ... */` block comments. Errors are
//! reported to the [`Log`] and produce [`DataToken::Error`] tokens.

use crate::token::{DataToken, Token};
use kiln_diagnostics::{DiagnosticKind, Log};
use kiln_source::{FileId, Span};

/// Lexes the given data source into a vector of tokens.
///
/// The returned vector always ends with a [`DataToken::Eof`] token.
pub fn lex(source: &str, file: FileId, log: &Log) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
        log,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
    log: &'a Log,
}

impl<'a> Lexer<'a> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: DataToken::Eof,
                    span: Span::new(self.file, self.pos as u32, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn error(&self, msg: &str, span: Span) {
        self.log.error(DiagnosticKind::Syntax, msg, span);
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                let mut depth = 1;
                while self.pos < self.source.len() && depth > 0 {
                    if self.source[self.pos] == b'/' && self.peek_at(1) == b'*' {
                        depth += 1;
                        self.pos += 2;
                    } else if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        depth -= 1;
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                    }
                }
                if depth > 0 {
                    self.error("unterminated block comment", self.span_from(start));
                }
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return self.lex_identifier(start);
        }
        if b.is_ascii_digit() {
            return self.lex_number(start);
        }
        if b == b'-' || b == b'+' {
            // Signed number, with or without integer digits before the dot.
            if self.peek_at(1).is_ascii_digit()
                || (self.peek_at(1) == b'.' && self.peek_at(2).is_ascii_digit())
            {
                self.pos += 1;
                return self.lex_number(start);
            }
            if b == b'-' && self.rest_starts_with(1, b"inf") && !is_ident_char(self.peek_at(4)) {
                self.pos += 4;
                return Token {
                    kind: DataToken::Float,
                    span: self.span_from(start),
                };
            }
        }
        if b == b'.' && self.peek_at(1).is_ascii_digit() {
            return self.lex_number(start);
        }
        if b == b'"' {
            return self.lex_string(start);
        }

        self.pos += 1;
        let kind = match b {
            b'{' => DataToken::LeftBrace,
            b'}' => DataToken::RightBrace,
            b'(' => DataToken::LeftParen,
            b')' => DataToken::RightParen,
            b'[' => DataToken::LeftBracket,
            b']' => DataToken::RightBracket,
            b',' => DataToken::Comma,
            b':' => DataToken::Colon,
            _ => {
                self.error(
                    &format!("unrecognized character '{}'", b as char),
                    self.span_from(start),
                );
                DataToken::Error
            }
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn rest_starts_with(&self, offset: usize, text: &[u8]) -> bool {
        let lo = self.pos + offset;
        let hi = lo + text.len();
        hi <= self.source.len() && &self.source[lo..hi] == text
    }

    fn lex_identifier(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }
        Token {
            kind: DataToken::Identifier,
            span: self.span_from(start),
        }
    }

    /// Lexes a number after an optional sign has been consumed. Produces a
    /// float token if the literal has a fractional part or an exponent.
    fn lex_number(&mut self, start: usize) -> Token {
        let mut is_float = false;
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            is_float = true;
            self.pos += 1;
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
        }
        if self.peek() == b'e' || self.peek() == b'E' {
            let mut exp = 1;
            if self.peek_at(exp) == b'+' || self.peek_at(exp) == b'-' {
                exp += 1;
            }
            if self.peek_at(exp).is_ascii_digit() {
                is_float = true;
                self.pos += exp;
                while self.peek().is_ascii_digit() {
                    self.pos += 1;
                }
            }
        }
        if is_ident_char(self.peek()) {
            while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
                self.pos += 1;
            }
            self.error("malformed numeric literal", self.span_from(start));
            return Token {
                kind: DataToken::Error,
                span: self.span_from(start),
            };
        }
        Token {
            kind: if is_float {
                DataToken::Float
            } else {
                DataToken::Int
            },
            span: self.span_from(start),
        }
    }

    /// Lexes a double-quoted string. `""` inside the literal encodes one
    /// quote character; decoding happens in the parser.
    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            if self.pos >= self.source.len() {
                self.error("unterminated string literal", self.span_from(start));
                return Token {
                    kind: DataToken::Error,
                    span: self.span_from(start),
                };
            }
            if self.source[self.pos] == b'"' {
                if self.peek_at(1) == b'"' {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
                break;
            }
            self.pos += 1;
        }
        Token {
            kind: DataToken::Str,
            span: self.span_from(start),
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
