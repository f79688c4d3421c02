use std::fmt;

use crate::util::num::format_number;

/// Represents a literal value in the language.
///
/// `Literal` covers the raw, constant values that can appear directly in
/// source code. Units are not part of a literal; a suffixed literal such as
/// `4px` is a [`Node::WithUnit`] wrapping the number.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A numeric literal, remembering whether it was written with a decimal
    /// point.
    Number {
        /// The value.
        value:    f64,
        /// `true` for `1.0`, `.5` and similar.
        is_float: bool,
    },
    /// A quoted string literal.
    String(String),
    /// A boolean literal value: `true` or `false`.
    Boolean(bool),
    /// A hex color literal, including its leading `#`.
    Hex(String),
}

/// The type written in a variable declaration, e.g. `Color.Rgb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// The base type name as written (`Number`, `Color`, ...).
    pub base:    String,
    /// The optional subtype after the dot (`Rgb` in `Color.Rgb`).
    pub subtype: Option<String>,
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtype {
            Some(subtype) => write!(f, "{}.{subtype}", self.base),
            None => write!(f, "{}", self.base),
        }
    }
}

/// An abstract syntax tree (AST) node.
///
/// `Node` covers every expression and statement of the language. Each variant
/// carries the line of the token it originates from, for error reporting.
/// Nodes are immutable once built and each is owned by exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal value.
    Literal {
        /// The constant value.
        value: Literal,
        /// Line number in the source code.
        line:  usize,
    },
    /// A `{name}` lookup in the host-supplied reference map.
    Reference {
        /// The full reference name, dots included.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A bare identifier naming a variable.
    Identifier {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// An expression followed by a unit suffix, e.g. `4px` or `(a + 1)rem`.
    WithUnit {
        /// The numeric expression.
        expr: Box<Self>,
        /// The normalized unit keyword.
        unit: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary operation.
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation.
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A list of two or more expressions.
    ///
    /// Implicit lists come from whitespace-separated expressions and render
    /// space-joined; explicit lists come from commas and render
    /// comma-joined.
    List {
        /// Elements of the list.
        elements: Vec<Self>,
        /// Whether the list was written without commas.
        implicit: bool,
        /// Line number in the source code.
        line:     usize,
    },
    /// Function call expression (e.g. `round(x)`).
    FunctionCall {
        /// Name of the function being called.
        name:      String,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Attribute access (`object.name`).
    Attribute {
        /// The receiver.
        object: Box<Self>,
        /// The attribute name.
        name:   String,
        /// Line number in the source code.
        line:   usize,
    },
    /// Method call (`object.name(arguments)`).
    MethodCall {
        /// The receiver.
        object:    Box<Self>,
        /// The method name.
        name:      String,
        /// Arguments to the method.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `variable name: Type = value;`
    Declaration {
        /// The name of the variable.
        name:      String,
        /// The declared type.
        type_decl: TypeDecl,
        /// The optional initializer.
        value:     Option<Box<Self>>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `name.path = value;`
    Reassignment {
        /// The variable being assigned.
        name:  String,
        /// Attribute path below the variable, empty for a plain assignment.
        path:  Vec<String>,
        /// The new value.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `return value`
    Return {
        /// The returned expression, if any.
        value: Option<Box<Self>>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `while (condition) [ body ]`
    While {
        /// The loop condition.
        condition: Box<Self>,
        /// The loop body, a [`Node::Block`].
        body:      Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `if (c) [..] elif (c) [..] else [..]`
    If {
        /// Conditions paired with their blocks, in source order.
        branches:    Vec<(Self, Self)>,
        /// The `else` block, if any.
        else_branch: Option<Box<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// A `[ ... ]` block, evaluated in a child scope.
    Block {
        /// The statements inside the block.
        body: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// Two or more statements, or none at all.
    Sequence {
        /// The statements in order.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
}

impl Node {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use tokenscript::ast::Node;
    ///
    /// let node = Node::Identifier { name: "x".to_string(),
    ///                               line: 5, };
    ///
    /// assert_eq!(node.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Reference { line, .. }
            | Self::Identifier { line, .. }
            | Self::WithUnit { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::List { line, .. }
            | Self::FunctionCall { line, .. }
            | Self::Attribute { line, .. }
            | Self::MethodCall { line, .. }
            | Self::Declaration { line, .. }
            | Self::Reassignment { line, .. }
            | Self::Return { line, .. }
            | Self::While { line, .. }
            | Self::If { line, .. }
            | Self::Block { line, .. }
            | Self::Sequence { line, .. } => *line,
        }
    }

    /// Returns `true` for an empty program.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Sequence { statements, .. } if statements.is_empty())
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::BinaryOp { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }

    const fn is_compound_statement(&self) -> bool {
        matches!(self, Self::While { .. } | Self::If { .. } | Self::Block { .. })
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Exponentiation (`^`)
    Pow,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
}

impl BinaryOperator {
    /// Binding strength, higher binds tighter.
    ///
    /// Mirrors the grammar: logic < additive < comparison < multiplicative
    /// < power.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::And | Self::Or => 1,
            Self::Add | Self::Sub => 2,
            Self::Less
            | Self::Greater
            | Self::LessEqual
            | Self::GreaterEqual
            | Self::Equal
            | Self::NotEqual => 3,
            Self::Mul | Self::Div => 4,
            Self::Pow => 5,
        }
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Unary plus (e.g. `+x`).
    Plus,
    /// Logical NOT (e.g. `!x`).
    Not,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or, Pow,
            Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Pow => "^",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "&&",
            Or => "||",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Plus => write!(f, "+"),
            Self::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { value, is_float } => write!(f, "{}", format_number(*value, *is_float)),
            Self::String(s) if s.contains('"') => write!(f, "'{s}'"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Hex(h) => write!(f, "{h}"),
        }
    }
}

/// Renders the node back to source text.
///
/// Parentheses are only emitted where precedence requires them, so
/// re-parsing the output yields the same tree.
///
/// # Example
/// ```
/// use tokenscript::interpreter::{parser::parse, units::UnitManager};
///
/// let units = UnitManager::default();
/// let ast = parse("return (1 + 2) * 3px", &units).unwrap();
///
/// assert_eq!(ast.to_string(), "return (1 + 2) * 3px");
/// ```
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Reference { name, .. } => write!(f, "{{{name}}}"),
            Self::Identifier { name, .. } => write!(f, "{name}"),
            Self::WithUnit { expr, unit, .. } => match expr.as_ref() {
                Self::Literal { .. } | Self::Reference { .. } | Self::Identifier { .. } => {
                    write!(f, "{expr}{unit}")
                },
                _ => write!(f, "({expr}){unit}"),
            },
            Self::UnaryOp { op, expr, .. } => match expr.as_ref() {
                Self::BinaryOp { .. } | Self::List { .. } => write!(f, "{op}({expr})"),
                _ => write!(f, "{op}{expr}"),
            },
            Self::BinaryOp { left, op, right, .. } => {
                let precedence = op.precedence();
                if left.precedence() < precedence {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                write!(f, " {op} ")?;
                if right.precedence() <= precedence {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            },
            Self::List { elements, implicit, .. } => {
                let separator = if *implicit { " " } else { ", " };
                write!(f, "{}", join(elements, separator))
            },
            Self::FunctionCall { name, arguments, .. } => {
                write!(f, "{name}({})", join(arguments, ", "))
            },
            Self::Attribute { object, name, .. } => write!(f, "{object}.{name}"),
            Self::MethodCall { object, name, arguments, .. } => {
                write!(f, "{object}.{name}({})", join(arguments, ", "))
            },
            Self::Declaration { name, type_decl, value, .. } => match value {
                Some(value) => write!(f, "variable {name}: {type_decl} = {value}"),
                None => write!(f, "variable {name}: {type_decl}"),
            },
            Self::Reassignment { name, path, value, .. } => {
                write!(f, "{name}")?;
                for segment in path {
                    write!(f, ".{segment}")?;
                }
                write!(f, " = {value}")
            },
            Self::Return { value: Some(value), .. } => write!(f, "return {value}"),
            Self::Return { value: None, .. } => write!(f, "return"),
            Self::While { condition, body, .. } => write!(f, "while ({condition}) {body}"),
            Self::If { branches, else_branch, .. } => {
                for (index, (condition, body)) in branches.iter().enumerate() {
                    let keyword = if index == 0 { "if" } else { " elif" };
                    write!(f, "{keyword} ({condition}) {body}")?;
                }
                match else_branch {
                    Some(body) => write!(f, " else {body}"),
                    None => Ok(()),
                }
            },
            Self::Block { body, .. } => {
                if body.is_empty() {
                    write!(f, "[]")
                } else if body.is_compound_statement() || matches!(body.as_ref(), Self::Sequence { .. }) {
                    write!(f, "[ {body} ]")
                } else {
                    write!(f, "[ {body}; ]")
                }
            },
            Self::Sequence { statements, .. } => {
                let rendered = statements.iter()
                                         .map(|statement| {
                                             if statement.is_compound_statement() {
                                                 statement.to_string()
                                             } else {
                                                 format!("{statement};")
                                             }
                                         })
                                         .collect::<Vec<_>>();
                write!(f, "{}", rendered.join(" "))
            },
        }
    }
}

fn join(nodes: &[Node], separator: &str) -> String {
    nodes.iter()
         .map(ToString::to_string)
         .collect::<Vec<_>>()
         .join(separator)
}
