use std::fmt;

use logos::Logos;

use crate::{
    error::{LexError, LexErrorKind},
    interpreter::units::UnitManager,
};

/// Code points that may never appear in an identifier.
///
/// These are the typographic double quotes, which editors substitute for
/// `"` and which would otherwise lex as part of a name.
const FORBIDDEN_IDENTIFIER_CHARS: &[char] = &['\u{201C}', '\u{201D}'];

/// A numeric literal together with whether it was written with a decimal
/// point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberLiteral {
    /// The parsed value.
    pub value:    f64,
    /// `true` for literals such as `1.0` or `.5`.
    pub is_float: bool,
}

/// Represents a lexical token in the source input.
///
/// Keywords, booleans, and unit keywords are never produced by the derived
/// lexer directly: they first lex as [`Token::Identifier`] and are then
/// classified case-insensitively by [`Lexer`].
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    /// Numeric literal tokens, such as `16`, `1.5` or `.5`.
    #[regex(r"[0-9]+", |lex| parse_number(lex, false))]
    #[regex(r"[0-9]+\.[0-9]+", |lex| parse_number(lex, true))]
    #[regex(r"\.[0-9]+", |lex| parse_number(lex, true))]
    Number(NumberLiteral),
    /// `true` or `false`.
    Bool(bool),
    /// `variable`
    Variable,
    /// `return`
    Return,
    /// `while`
    While,
    /// `if`
    If,
    /// `elif`
    Elif,
    /// `else`
    Else,
    /// Bare words: variable names, function names, and type names.
    #[regex(r"[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\-\x{80}-\x{10FFFF}]*", lex_identifier)]
    Identifier(String),
    /// A unit keyword such as `px` or `%`.
    #[token("%", |_| String::from("%"))]
    Unit(String),
    /// `{name}` references into the host-supplied value map.
    #[token("{", lex_reference)]
    Reference(String),
    /// `"text"` or `'text'`.
    #[token("\"", |lex| lex_string(lex, '"'))]
    #[token("'", |lex| lex_string(lex, '\''))]
    ExplicitString(String),
    /// `#RGB` or `#RRGGBB`.
    #[regex(r"#[0-9a-zA-Z_]*", lex_hex)]
    HexColor(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `^`
    #[token("^")]
    Caret,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `<`
    #[token("<")]
    Less,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// Line breaks only advance the line counter.
    #[token("\n", newline)]
    NewLine,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n.value),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Variable => write!(f, "variable"),
            Self::Return => write!(f, "return"),
            Self::While => write!(f, "while"),
            Self::If => write!(f, "if"),
            Self::Elif => write!(f, "elif"),
            Self::Else => write!(f, "else"),
            Self::Identifier(s) | Self::Unit(s) | Self::HexColor(s) => write!(f, "{s}"),
            Self::Reference(s) => write!(f, "{{{s}}}"),
            Self::ExplicitString(s) => write!(f, "\"{s}\""),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Caret => write!(f, "^"),
            Self::Bang => write!(f, "!"),
            Self::Equals => write!(f, "="),
            Self::EqualEqual => write!(f, "=="),
            Self::BangEqual => write!(f, "!="),
            Self::Greater => write!(f, ">"),
            Self::Less => write!(f, "<"),
            Self::GreaterEqual => write!(f, ">="),
            Self::LessEqual => write!(f, "<="),
            Self::AndAnd => write!(f, "&&"),
            Self::OrOr => write!(f, "||"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Colon => write!(f, ":"),
            Self::Dot => write!(f, "."),
            Self::Comment => write!(f, "//"),
            Self::NewLine => write!(f, "\\n"),
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and where it starts so that every token
/// can report a line and column.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

/// A token together with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// The token itself.
    pub token:  Token,
    /// The 1-based source line.
    pub line:   usize,
    /// The 1-based column of the token's first character.
    pub column: usize,
}

/// Produces tokens lazily with one token of lookahead.
///
/// Wraps the derived `logos` lexer and classifies bare words into keywords,
/// booleans, and unit keywords. Unit keywords come from the active
/// [`UnitManager`], so registering a unit makes it lexable.
///
/// # Example
/// ```
/// use tokenscript::interpreter::{
///     lexer::{Lexer, Token},
///     units::UnitManager,
/// };
///
/// let units = UnitManager::default();
/// let mut lexer = Lexer::new("variable w: NumberWithUnit = 4PX;", &units);
///
/// assert_eq!(lexer.next_token().unwrap().unwrap().token, Token::Variable);
/// assert_eq!(lexer.peek_token().unwrap().unwrap().token,
///            Token::Identifier("w".to_string()));
/// assert_eq!(lexer.next_token().unwrap().unwrap().token,
///            Token::Identifier("w".to_string()));
/// ```
pub struct Lexer<'src> {
    inner:  logos::Lexer<'src, Token>,
    units:  &'src UnitManager,
    peeked: Option<Option<Lexeme>>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over `source` that recognizes the units in `units`.
    #[must_use]
    pub fn new(source: &'src str, units: &'src UnitManager) -> Self {
        Self { inner: Token::lexer_with_extras(source, LexerExtras { line:       1,
                                                                    line_start: 0, }),
               units,
               peeked: None }
    }

    /// Consumes and returns the next token, or `None` at the end of input.
    pub fn next_token(&mut self) -> Result<Option<Lexeme>, LexError> {
        match self.peeked.take() {
            Some(lexeme) => Ok(lexeme),
            None => self.lex(),
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Option<&Lexeme>, LexError> {
        if self.peeked.is_none() {
            let lexeme = self.lex()?;
            self.peeked = Some(lexeme);
        }
        Ok(self.peeked.as_ref().and_then(Option::as_ref))
    }

    /// The line the lexer is currently on, used for end-of-input errors.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.inner.extras.line
    }

    fn lex(&mut self) -> Result<Option<Lexeme>, LexError> {
        let Some(result) = self.inner.next() else {
            return Ok(None);
        };
        let line = self.inner.extras.line;
        let start = self.inner.span().start;
        let column = self.inner
                         .source()
                         .get(self.inner.extras.line_start..start)
                         .map_or(1, |prefix| prefix.chars().count() + 1);

        match result {
            Ok(token) => Ok(Some(Lexeme { token: self.classify(token),
                                          line,
                                          column })),
            Err(kind) => Err(LexError { kind,
                                        line,
                                        column,
                                        token: self.inner.slice().to_string() }),
        }
    }

    /// Turns bare words into keywords, booleans, or units.
    fn classify(&self, token: Token) -> Token {
        let Token::Identifier(word) = token else {
            return token;
        };

        match word.to_ascii_lowercase().as_str() {
            "variable" => Token::Variable,
            "return" => Token::Return,
            "while" => Token::While,
            "if" => Token::If,
            "elif" => Token::Elif,
            "else" => Token::Else,
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            _ => match self.units.keyword(&word) {
                Some(unit) => Token::Unit(unit.to_string()),
                None => Token::Identifier(word),
            },
        }
    }
}

fn parse_number(lex: &logos::Lexer<Token>, is_float: bool) -> Result<NumberLiteral, LexErrorKind> {
    let slice = lex.slice();
    let value = if slice.starts_with('.') {
        format!("0{slice}").parse::<f64>()
    } else {
        slice.parse::<f64>()
    };

    value.ok()
         .filter(|v| v.is_finite())
         .map(|value| NumberLiteral { value, is_float })
         .ok_or(LexErrorKind::InvalidNumber)
}

fn lex_identifier(lex: &logos::Lexer<Token>) -> Result<String, LexErrorKind> {
    let slice = lex.slice();
    if slice.contains(FORBIDDEN_IDENTIFIER_CHARS) {
        return Err(LexErrorKind::InvalidIdentifier);
    }
    Ok(slice.to_string())
}

/// Scans a reference body up to the closing `}`.
///
/// References may not nest and may not span lines.
fn lex_reference(lex: &mut logos::Lexer<Token>) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    for (offset, ch) in rest.char_indices() {
        match ch {
            '}' => {
                let name = rest[..offset].trim().to_string();
                lex.bump(offset + 1);
                if name.is_empty() {
                    return Err(LexErrorKind::EmptyReference);
                }
                return Ok(name);
            },
            '{' => return Err(LexErrorKind::NestedReference),
            '\n' => return Err(LexErrorKind::UnterminatedReference),
            _ => {},
        }
    }
    Err(LexErrorKind::UnterminatedReference)
}

/// Scans a quoted string up to the matching `quote` on the same line.
fn lex_string(lex: &mut logos::Lexer<Token>, quote: char) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    for (offset, ch) in rest.char_indices() {
        if ch == quote {
            let text = rest[..offset].to_string();
            lex.bump(offset + ch.len_utf8());
            return Ok(text);
        }
        if ch == '\n' {
            return Err(LexErrorKind::UnterminatedString);
        }
    }
    Err(LexErrorKind::UnterminatedString)
}

fn lex_hex(lex: &logos::Lexer<Token>) -> Result<String, LexErrorKind> {
    let slice = lex.slice();
    let digits = &slice[1..];
    if matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(slice.to_string())
    } else {
        Err(LexErrorKind::InvalidHexColor)
    }
}

fn newline(lex: &mut logos::Lexer<Token>) -> logos::Skip {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
    logos::Skip
}
