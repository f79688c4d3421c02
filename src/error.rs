use thiserror::Error;

/// Lexical errors.
///
/// Defines the errors raised while turning source text into tokens:
/// unterminated strings and references, malformed hex colors, and characters
/// that cannot start any token.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the AST. Parse
/// errors include unexpected tokens, missing delimiters, and malformed type
/// declarations. They can render a caret-marked source excerpt.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. Runtime
/// errors include type mismatches, unknown names, division by zero, unit
/// mismatches, missing color conversions, and loop overflows.
pub mod runtime_error;
/// Specification errors.
///
/// Raised when a host registers a malformed color or unit specification.
pub mod spec_error;
/// Token set errors.
///
/// Raised while flattening or resolving a design-token document: malformed
/// JSON, circular or dangling references, and token values that fail.
pub mod token_error;

pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use spec_error::SpecError;
pub use token_error::TokenSetError;

/// Any error that aborts an interpretation.
///
/// The three kinds share the same shape (message, line, token) and are
/// discriminated by the phase that produced them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LanguageError {
    /// Raised by the lexer.
    #[error(transparent)]
    Lexical(#[from] LexError),
    /// Raised by the parser.
    #[error(transparent)]
    Syntax(#[from] ParseError),
    /// Raised by the evaluator.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl LanguageError {
    /// Returns the human-readable message, including the line prefix.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the source line the error refers to, if known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        let line = match self {
            Self::Lexical(e) => e.line,
            Self::Syntax(e) => e.line(),
            Self::Runtime(e) => e.line(),
        };
        if line == 0 { None } else { Some(line) }
    }

    /// Returns the offending token, if the error is tied to one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Lexical(e) => Some(e.token.as_str()),
            Self::Syntax(e) => e.token(),
            Self::Runtime(e) => e.token(),
        }
    }

    /// Renders the error together with the relevant part of `source`.
    ///
    /// Syntax and lexical errors get a caret under the offending column;
    /// runtime errors only print their message.
    #[must_use]
    pub fn report(&self, source: &str) -> String {
        match self {
            Self::Lexical(e) => {
                format!("{e}\n{}", parse_error::excerpt(source, e.line, e.column))
            },
            Self::Syntax(e) => match e.excerpt(source) {
                Some(excerpt) => format!("{e}\n{excerpt}"),
                None => e.to_string(),
            },
            Self::Runtime(e) => e.to_string(),
        }
    }
}
