use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::{
    ast::{Literal, Node},
    config::Config,
    error::{LanguageError, RuntimeError},
    interpreter::{
        parser::parse,
        symbol_table::SymbolTable,
        value::{core::Value, number::NumberSymbol},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Why statement evaluation stopped early.
///
/// `return` unwinds to the top of the program carrying its value; errors
/// unwind the same way but abort the whole evaluation.
#[derive(Debug)]
pub enum Signal {
    /// A `return` statement was reached.
    Return(Value),
    /// A runtime error.
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Self {
        Self::Error(error)
    }
}

/// Result type of statement evaluation.
pub type Flow<T> = Result<T, Signal>;

/// What an evaluator runs: source text, or a tree parsed earlier.
#[derive(Debug, Clone)]
pub enum Program {
    /// Source text, parsed when the evaluator runs.
    Source(String),
    /// A parsed program, shared between runs.
    Ast(Arc<Node>),
}

impl From<&str> for Program {
    fn from(source: &str) -> Self {
        Self::Source(source.to_string())
    }
}

impl From<String> for Program {
    fn from(source: String) -> Self {
        Self::Source(source)
    }
}

impl From<Node> for Program {
    fn from(ast: Node) -> Self {
        Self::Ast(Arc::new(ast))
    }
}

impl From<Arc<Node>> for Program {
    fn from(ast: Arc<Node>) -> Self {
        Self::Ast(ast)
    }
}

/// Walks a program and computes its value.
///
/// An evaluator owns its variables; references and registries are read
/// only. Color scripts run in their own evaluators sharing the same
/// [`Config`].
///
/// # Example
/// ```
/// use std::collections::HashMap;
///
/// use tokenscript::interpreter::{evaluator::core::Evaluator, value::core::Value};
///
/// let references = HashMap::from([("base".to_string(), Value::with_unit(4.0, "px"))]);
/// let mut evaluator = Evaluator::new("variable x: NumberWithUnit = {base} * 2; return x;",
///                                    references,
///                                    None,
///                                    None);
///
/// assert_eq!(evaluator.interpret().unwrap(), Value::with_unit(8.0, "px"));
/// assert!(evaluator.symbols().get("x").is_some());
/// ```
pub struct Evaluator {
    program:              Program,
    pub(crate) references: HashMap<String, Value>,
    pub(crate) symbols:    SymbolTable,
    pub(crate) config:     Config,
    pub(crate) result_line: usize,
}

impl Evaluator {
    /// Creates an evaluator.
    ///
    /// # Parameters
    /// - `program`: Source text or a parsed tree.
    /// - `references`: Values available as `{name}`.
    /// - `symbols`: Predeclared variables; a fresh table when `None`.
    /// - `config`: Iteration limit and registries; the default when `None`.
    #[must_use]
    pub fn new(program: impl Into<Program>,
               references: HashMap<String, Value>,
               symbols: Option<SymbolTable>,
               config: Option<Config>)
               -> Self {
        Self { program: program.into(),
               references,
               symbols: symbols.unwrap_or_default(),
               config: config.unwrap_or_default(),
               result_line: 1 }
    }

    /// Runs the program.
    ///
    /// A `return` anywhere ends the program with its value. Otherwise the
    /// value of the last statement is the result, and an empty program
    /// yields an empty string.
    ///
    /// # Errors
    /// Returns the first lexical, syntax, or runtime error.
    pub fn interpret(&mut self) -> Result<Value, LanguageError> {
        let ast = match &self.program {
            Program::Source(source) => Arc::new(parse(source, &self.config.units)?),
            Program::Ast(ast) => Arc::clone(ast),
        };
        if ast.is_empty() {
            return Ok(Value::string(""));
        }

        match self.eval_statement(&ast) {
            Ok(value) | Err(Signal::Return(value)) => Ok(value),
            Err(Signal::Error(error)) => {
                debug!(%error, "evaluation failed");
                Err(error.into())
            },
        }
    }

    /// The variables after (or before) a run.
    #[must_use]
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The line of the statement that produced the last result.
    #[must_use]
    pub const fn result_line(&self) -> usize {
        self.result_line
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluates an expression.
    ///
    /// The evaluator dispatches on the node kind: literals, references,
    /// variables, unit suffixes, operators, lists, function calls,
    /// attribute reads and method calls.
    ///
    /// # Errors
    /// Returns a `TypeError` for a statement node, which the parser never
    /// puts in expression position.
    pub fn eval_expression(&mut self, node: &Node) -> EvalResult<Value> {
        match node {
            Node::Literal { value, .. } => Ok(Self::eval_literal(value)),
            Node::Reference { name, line } => {
                self.references
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownReference { name: name.clone(),
                                                                    line: *line, })
            },
            Node::Identifier { name, line } => {
                self.symbols
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownVariable { name: name.clone(),
                                                                   line: *line, })
            },
            Node::WithUnit { expr, unit, line } => self.eval_with_unit(expr, unit, *line),
            Node::UnaryOp { op, expr, line } => {
                let value = self.eval_expression(expr)?;
                Self::eval_unary(*op, &value, *line)
            },
            Node::BinaryOp { left, op, right, line } => {
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                self.eval_binary(*op, &left, &right, *line)
            },
            Node::List { elements, implicit, .. } => {
                let values = self.eval_arguments(elements)?;
                Ok(Value::list(values, *implicit))
            },
            Node::FunctionCall { name,
                                 arguments,
                                 line, } => self.eval_function_call(name, arguments, *line),
            Node::Attribute { object, name, line } => self.eval_attribute(object, name, *line),
            Node::MethodCall { object,
                               name,
                               arguments,
                               line, } => self.eval_method_call(object, name, arguments, *line),
            other => Err(RuntimeError::TypeError { details: format!("expected an expression, found '{other}'"),
                                                   line:    other.line_number(), }),
        }
    }

    /// Converts a literal into a value.
    #[must_use]
    pub fn eval_literal(value: &Literal) -> Value {
        match value {
            Literal::Number { value, is_float } => {
                Value::Number(NumberSymbol { value:    Some(*value),
                                             is_float: *is_float, })
            },
            Literal::String(text) => Value::string(text.as_str()),
            Literal::Boolean(b) => Value::from(*b),
            Literal::Hex(hex) => Value::hex(hex),
        }
    }

    /// Evaluates each node in order.
    pub(crate) fn eval_arguments(&mut self, nodes: &[Node]) -> EvalResult<Vec<Value>> {
        nodes.iter().map(|node| self.eval_expression(node)).collect()
    }

    /// Attaches a unit to a plain number, e.g. `(1 + 2)px`.
    fn eval_with_unit(&mut self, expr: &Node, unit: &str, line: usize) -> EvalResult<Value> {
        match self.eval_expression(expr)? {
            Value::Number(NumberSymbol { value: Some(value), .. }) => Ok(Value::with_unit(value, unit)),
            other => Err(RuntimeError::TypeError { details: format!("cannot attach unit '{unit}' to {}",
                                                                    other.type_label()),
                                                   line }),
        }
    }
}
