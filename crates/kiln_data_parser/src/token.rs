//! Token types for the data lexer.

use kiln_source::Span;
use serde::{Deserialize, Serialize};

/// A data token kind.
///
/// Literal text is not stored in the token; it is retrieved from the source
/// using the token's span. String tokens span the opening and closing quote.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DataToken {
    /// An integer literal, optionally signed.
    Int,
    /// A float literal: has a `.`, an exponent, or is `nan`/`inf`/`-inf`.
    Float,
    /// A double-quoted string literal, `""` escaping a quote.
    Str,
    /// A bare name: a boolean, an enum variant, or a map key.
    Identifier,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// A token the lexer could not recognize.
    Error,
    /// End of input.
    Eof,
}

/// A token with its source location.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: DataToken,
    /// The byte range the token covers.
    pub span: Span,
}
