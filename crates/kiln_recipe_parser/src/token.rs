//! Token types for the recipe lexer.

use kiln_source::Span;
use serde::{Deserialize, Serialize};

/// A recipe token kind.
///
/// Identifier text is not stored in the token; it is retrieved from the
/// source using the token's span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum RecipeToken {
    /// `include`
    Include,
    /// `struct`
    Struct,
    /// `enum`
    Enum,
    /// A name: type, member, variant, or generic parameter.
    Identifier,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `<`
    LeftAngle,
    /// `>`
    RightAngle,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// A token the lexer could not recognize.
    Error,
    /// End of input.
    Eof,
}

/// A token with its source location.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: RecipeToken,
    /// The byte range the token covers.
    pub span: Span,
}

/// Maps an identifier to its keyword token, if it is one.
pub fn lookup_keyword(text: &str) -> Option<RecipeToken> {
    match text {
        "include" => Some(RecipeToken::Include),
        "struct" => Some(RecipeToken::Struct),
        "enum" => Some(RecipeToken::Enum),
        _ => None,
    }
}
