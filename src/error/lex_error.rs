use thiserror::Error;

/// The reason a piece of source text could not be tokenized.
///
/// This type doubles as the `logos` error type, so it must have a default
/// variant for input that matches no token at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub enum LexErrorKind {
    /// No token starts with this character.
    #[default]
    #[error("Unexpected character")]
    UnexpectedCharacter,
    /// A quoted string reached the end of input without its closing quote.
    #[error("Unterminated string")]
    UnterminatedString,
    /// A `{` reached the end of the line without a matching `}`.
    #[error("Unterminated reference")]
    UnterminatedReference,
    /// A `{` appeared inside a reference.
    #[error("Nested references are not allowed")]
    NestedReference,
    /// A reference with no name, `{}`.
    #[error("Empty reference")]
    EmptyReference,
    /// A `#` color that is not exactly 3 or 6 hex digits.
    #[error("Hex colors must have exactly 3 or 6 hex digits")]
    InvalidHexColor,
    /// An identifier containing a forbidden code point.
    #[error("Identifier contains a forbidden character")]
    InvalidIdentifier,
    /// A number literal that does not fit an `f64`.
    #[error("Invalid number literal")]
    InvalidNumber,
}

/// A lexical error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error on line {line}: {kind}: '{token}'.")]
pub struct LexError {
    /// What went wrong.
    pub kind:   LexErrorKind,
    /// The source line where the error occurred.
    pub line:   usize,
    /// The 1-based column of the offending text.
    pub column: usize,
    /// The offending source text.
    pub token:  String,
}
