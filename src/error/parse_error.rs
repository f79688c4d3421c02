use thiserror::Error;

/// Number of source lines shown above and below the offending line.
const CONTEXT_LINES: usize = 2;

/// Represents all errors that can occur while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The token encountered.
        token:  String,
        /// The source line where the error occurred.
        line:   usize,
        /// The 1-based column of the token.
        column: usize,
    },
    /// A specific token was required but another one was found.
    #[error("Error on line {line}: Expected {expected}, found {found}.")]
    ExpectedToken {
        /// A description of what was expected.
        expected: String,
        /// The token actually found.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// The 1-based column of the token.
        column:   usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// A description of what was expected.
        expected: String,
        /// The last line of the source.
        line:     usize,
    },
    /// A variable declaration names a malformed type.
    #[error("Error on line {line}: Invalid type declaration '{found}'.")]
    InvalidTypeDeclaration {
        /// The offending text.
        found:  String,
        /// The source line where the error occurred.
        line:   usize,
        /// The 1-based column of the token.
        column: usize,
    },
}

impl ParseError {
    /// Returns the source line of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::ExpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line, .. }
            | Self::InvalidTypeDeclaration { line, .. } => *line,
        }
    }

    /// Returns the column of the offending token, when there is one.
    #[must_use]
    pub const fn column(&self) -> Option<usize> {
        match self {
            Self::UnexpectedToken { column, .. }
            | Self::ExpectedToken { column, .. }
            | Self::InvalidTypeDeclaration { column, .. } => Some(*column),
            Self::UnexpectedEndOfInput { .. } => None,
        }
    }

    /// Returns the offending token text.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::UnexpectedToken { token, .. } => Some(token),
            Self::ExpectedToken { found, .. } | Self::InvalidTypeDeclaration { found, .. } => {
                Some(found)
            },
            Self::UnexpectedEndOfInput { .. } => None,
        }
    }

    /// Renders the offending line of `source` with a caret under the column.
    ///
    /// Up to two lines before and after are included for context. Returns
    /// `None` for errors without a column.
    ///
    /// # Example
    /// ```
    /// use tokenscript::error::ParseError;
    ///
    /// let error = ParseError::UnexpectedToken { token:  ")".to_string(),
    ///                                           line:   2,
    ///                                           column: 5, };
    /// let excerpt = error.excerpt("variable a: Number = 1;\nreturn );").unwrap();
    ///
    /// assert!(excerpt.contains("return );"));
    /// assert!(excerpt.ends_with("    ^"));
    /// ```
    #[must_use]
    pub fn excerpt(&self, source: &str) -> Option<String> {
        self.column()
            .map(|column| excerpt(source, self.line(), column))
    }
}

/// Renders `line` of `source` with surrounding context and a caret marker.
///
/// Lines are numbered in a gutter; the caret line sits directly under the
/// offending line.
pub(crate) fn excerpt(source: &str, line: usize, column: usize) -> String {
    let lines = source.lines().collect::<Vec<_>>();
    if line == 0 || line > lines.len() {
        return String::new();
    }

    let first = line.saturating_sub(CONTEXT_LINES).max(1);
    let last = (line + CONTEXT_LINES).min(lines.len());
    let width = last.to_string().len();

    let mut out = Vec::new();
    for number in first..=last {
        out.push(format!("{number:>width$} | {}", lines[number - 1]));
        if number == line {
            let padding = " ".repeat(width + 3 + column.saturating_sub(1));
            out.push(format!("{padding}^"));
        }
    }
    out.join("\n")
}
