use thiserror::Error;

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Tried to read or assign an undeclared variable.
    #[error("Error on line {line}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `{reference}` is missing from the reference map.
    #[error("Error on line {line}: Unknown reference '{{{name}}}'.")]
    UnknownReference {
        /// The reference name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a function that is neither built in, a color initializer, nor
    /// an uninterpreted keyword.
    #[error("Error on line {line}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a method the receiver does not have.
    #[error("Error on line {line}: {type_name} has no method '{name}'.")]
    UnknownMethod {
        /// The receiver's type name.
        type_name: String,
        /// The method name.
        name:      String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Read or wrote an attribute the receiver does not have.
    #[error("Error on line {line}: {type_name} has no attribute '{name}'.")]
    UnknownAttribute {
        /// The receiver's type name.
        type_name: String,
        /// The attribute name.
        name:      String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Declared a variable that already exists.
    #[error("Error on line {line}: Variable '{name}' is already declared.")]
    VariableRedeclaration {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Declared a variable whose name contains punctuation.
    #[error("Error on line {line}: Invalid variable name '{name}'.")]
    InvalidVariableName {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Declared a variable with a type that does not exist.
    #[error("Error on line {line}: Unknown type '{name}'.")]
    UnknownType {
        /// The type as written.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had an unexpected or incompatible type.
    #[error("Error on line {line}: Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An operator was applied to operands it does not support.
    #[error("Error on line {line}: Cannot apply '{op}' to {left} and {right}.")]
    InvalidOperation {
        /// The operator.
        op:    String,
        /// The left operand's type name.
        left:  String,
        /// The right operand's type name.
        right: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The wrong number of arguments was supplied.
    #[error("Error on line {line}: '{name}' expects {expected} arguments, found {found}.")]
    ArgumentCountMismatch {
        /// The function or method name.
        name:     String,
        /// A description of the accepted arity.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An argument was invalid or out of range.
    #[error("Error on line {line}: Invalid argument: {details}.")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Tried to access a list element outside the allowed bounds.
    #[error("Error on line {line}: Index {index} out of bounds for length {length}.")]
    IndexOutOfBounds {
        /// The requested index.
        index:  i64,
        /// The length of the list.
        length: usize,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// Attempted division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Two units that cannot be combined.
    #[error("Error on line {line}: Cannot combine units '{left}' and '{right}'.")]
    UnitMismatch {
        /// The first unit.
        left:  String,
        /// The second unit.
        right: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A relative unit with more than one candidate anchor.
    #[error("Error on line {line}: Cannot convert multiple relative units.")]
    AmbiguousRelativeUnits {
        /// The source line where the error occurred.
        line: usize,
    },
    /// No chain of registered conversions connects two color formats.
    #[error("Error on line {line}: No conversion path from '{from}' to '{to}'.")]
    NoConversionPath {
        /// The source format.
        from: String,
        /// The requested format.
        to:   String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A color format name that is not registered.
    #[error("Error on line {line}: Unknown color format '{name}'.")]
    UnknownColorFormat {
        /// The format name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A color script returned something unusable.
    #[error("Error on line {line}: Color script for '{format}' failed: {details}.")]
    ColorScript {
        /// The format whose script failed.
        format:  String,
        /// What went wrong.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A `while` loop exceeded the configured iteration limit.
    #[error("Error on line {line}: Loop exceeded the maximum of {limit} iterations.")]
    IterationLimit {
        /// The configured maximum.
        limit: usize,
        /// The source line of the loop.
        line:  usize,
    },
    /// A method or function produced no value.
    #[error("Error on line {line}: '{name}' returned an empty result.")]
    EmptyResult {
        /// The method or function name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
}

impl RuntimeError {
    /// Returns the source line of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownVariable { line, .. }
            | Self::UnknownReference { line, .. }
            | Self::UnknownFunction { line, .. }
            | Self::UnknownMethod { line, .. }
            | Self::UnknownAttribute { line, .. }
            | Self::VariableRedeclaration { line, .. }
            | Self::InvalidVariableName { line, .. }
            | Self::UnknownType { line, .. }
            | Self::TypeError { line, .. }
            | Self::InvalidOperation { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::InvalidArgument { line, .. }
            | Self::IndexOutOfBounds { line, .. }
            | Self::DivisionByZero { line }
            | Self::UnitMismatch { line, .. }
            | Self::AmbiguousRelativeUnits { line }
            | Self::NoConversionPath { line, .. }
            | Self::UnknownColorFormat { line, .. }
            | Self::ColorScript { line, .. }
            | Self::IterationLimit { line, .. }
            | Self::EmptyResult { line, .. } => *line,
        }
    }

    /// Returns the name or operator the error is about, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::UnknownVariable { name, .. }
            | Self::UnknownReference { name, .. }
            | Self::UnknownFunction { name, .. }
            | Self::UnknownMethod { name, .. }
            | Self::UnknownAttribute { name, .. }
            | Self::VariableRedeclaration { name, .. }
            | Self::InvalidVariableName { name, .. }
            | Self::UnknownType { name, .. }
            | Self::ArgumentCountMismatch { name, .. }
            | Self::UnknownColorFormat { name, .. }
            | Self::EmptyResult { name, .. } => Some(name),
            Self::InvalidOperation { op, .. } => Some(op),
            Self::NoConversionPath { to, .. } => Some(to),
            Self::ColorScript { format, .. } => Some(format),
            Self::UnitMismatch { right, .. } => Some(right),
            Self::TypeError { .. }
            | Self::InvalidArgument { .. }
            | Self::IndexOutOfBounds { .. }
            | Self::DivisionByZero { .. }
            | Self::AmbiguousRelativeUnits { .. }
            | Self::IterationLimit { .. } => None,
        }
    }
}
