//! Lexical analyzer for recipe source text.
//!
//! Converts source text into a sequence of [`Token`]s, skipping whitespace,
//! `//` line comments, and nestable `/* ... */` block comments. Errors are
//! reported to the [`Log`] and produce [`RecipeToken::Error`] tokens.

use crate::token::{lookup_keyword, RecipeToken, Token};
use kiln_diagnostics::{DiagnosticKind, Log};
use kiln_source::{FileId, Span};

/// Lexes the given recipe source into a vector of tokens.
///
/// The returned vector always ends with a [`RecipeToken::Eof`] token.
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
                    kind: RecipeToken::Eof,
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
            // Line comment: //
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            // Block comment: /* ... */, nestable
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
            while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
                self.pos += 1;
            }
            let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
            let kind = lookup_keyword(text).unwrap_or(RecipeToken::Identifier);
            return Token {
                kind,
                span: self.span_from(start),
            };
        }

        self.pos += 1;
        let kind = match b {
            b'{' => RecipeToken::LeftBrace,
            b'}' => RecipeToken::RightBrace,
            b'(' => RecipeToken::LeftParen,
            b')' => RecipeToken::RightParen,
            b'<' => RecipeToken::LeftAngle,
            b'>' => RecipeToken::RightAngle,
            b',' => RecipeToken::Comma,
            b':' => RecipeToken::Colon,
            b';' => RecipeToken::Semicolon,
            _ => {
                self.error(
                    &format!("unrecognized character '{}'", b as char),
                    self.span_from(start),
                );
                RecipeToken::Error
            }
        };
        Token {
            kind,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_tokens(source: &str) -> Vec<Token> {
        let log = Log::new();
        let tokens = lex(source, FileId::from_raw(0), &log);
        assert!(log.good(), "unexpected errors: {:?}", log.messages());
        tokens
    }

    fn kinds(tokens: &[Token]) -> Vec<RecipeToken> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(&lex_tokens("")), vec![RecipeToken::Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = lex_tokens("include struct enum width");
        assert_eq!(
            kinds(&tokens),
            vec![
                RecipeToken::Include,
                RecipeToken::Struct,
                RecipeToken::Enum,
                RecipeToken::Identifier,
                RecipeToken::Eof,
            ]
        );
    }

    #[test]
    fn punctuation() {
        let tokens = lex_tokens("{ } ( ) < > , : ;");
        assert_eq!(
            kinds(&tokens),
            vec![
                RecipeToken::LeftBrace,
                RecipeToken::RightBrace,
                RecipeToken::LeftParen,
                RecipeToken::RightParen,
                RecipeToken::LeftAngle,
                RecipeToken::RightAngle,
                RecipeToken::Comma,
                RecipeToken::Colon,
                RecipeToken::Semicolon,
                RecipeToken::Eof,
            ]
        );
    }

    #[test]
    fn member_declaration() {
        let tokens = lex_tokens("width: u32");
        assert_eq!(
            kinds(&tokens),
            vec![
                RecipeToken::Identifier,
                RecipeToken::Colon,
                RecipeToken::Identifier,
                RecipeToken::Eof,
            ]
        );
    }

    #[test]
    fn line_comment() {
        let tokens = lex_tokens("width // the window width\n: u32");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, RecipeToken::Identifier);
        assert_eq!(tokens[1].kind, RecipeToken::Colon);
    }

    #[test]
    fn nested_block_comment() {
        let tokens = lex_tokens("a /* outer /* inner */ still */ b");
        assert_eq!(
            kinds(&tokens),
            vec![
                RecipeToken::Identifier,
                RecipeToken::Identifier,
                RecipeToken::Eof
            ]
        );
    }

    #[test]
    fn unterminated_block_comment_error() {
        let log = Log::new();
        lex("a /* no end", FileId::from_raw(0), &log);
        assert!(!log.good());
    }

    #[test]
    fn unrecognized_char_error() {
        let log = Log::new();
        let tokens = lex("width = u32", FileId::from_raw(0), &log);
        assert!(!log.good());
        assert!(tokens.iter().any(|t| t.kind == RecipeToken::Error));
    }

    #[test]
    fn spans_are_correct() {
        let tokens = lex_tokens("struct Config");
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!(tokens[0].span.end, 6);
        assert_eq!(tokens[1].span.start, 7);
        assert_eq!(tokens[1].span.end, 13);
    }
}
