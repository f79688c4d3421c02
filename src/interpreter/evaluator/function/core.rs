use tracing::trace;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            function::{builtin, log, min_max, round, trig},
        },
        value::{core::Value, method::CallContext},
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives a slice of evaluated argument values and the call
/// context, which carries the line number and the configuration.
pub type BuiltinFn = fn(&[Value], &CallContext) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `Range(min, max)` accepts any count from `min` to `max` inclusive.
/// - `AtLeast(n)` accepts `n` or more arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of all built-in functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "min"       => { arity: Arity::AtLeast(1), func: |args, ctx| min_max::min_max("min", args, ctx) },
    "max"       => { arity: Arity::AtLeast(1), func: |args, ctx| min_max::min_max("max", args, ctx) },
    "sum"       => { arity: Arity::AtLeast(1), func: min_max::sum },
    "average"   => { arity: Arity::AtLeast(1), func: min_max::average },
    "round"     => { arity: Arity::Range(1, 2), func: round::round },
    "round_to"  => { arity: Arity::Range(1, 2), func: round::round },
    "roundto"   => { arity: Arity::Range(1, 2), func: round::round },
    "abs"       => { arity: Arity::Exact(1), func: |args, ctx| builtin::keep_unit("abs", f64::abs, args, ctx) },
    "floor"     => { arity: Arity::Exact(1), func: |args, ctx| builtin::keep_unit("floor", f64::floor, args, ctx) },
    "ceil"      => { arity: Arity::Exact(1), func: |args, ctx| builtin::keep_unit("ceil", f64::ceil, args, ctx) },
    "sqrt"      => { arity: Arity::Exact(1), func: builtin::sqrt },
    "pow"       => { arity: Arity::Exact(2), func: builtin::pow },
    "parse_int" => { arity: Arity::Range(1, 2), func: builtin::parse_int },
    "parseint"  => { arity: Arity::Range(1, 2), func: builtin::parse_int },
    "sin"       => { arity: Arity::Exact(1), func: |args, ctx| trig::direct(f64::sin, args, ctx) },
    "cos"       => { arity: Arity::Exact(1), func: |args, ctx| trig::direct(f64::cos, args, ctx) },
    "tan"       => { arity: Arity::Exact(1), func: |args, ctx| trig::direct(f64::tan, args, ctx) },
    "asin"      => { arity: Arity::Exact(1), func: |args, ctx| trig::inverse("asin", f64::asin, args, ctx) },
    "acos"      => { arity: Arity::Exact(1), func: |args, ctx| trig::inverse("acos", f64::acos, args, ctx) },
    "atan"      => { arity: Arity::Exact(1), func: |args, ctx| trig::inverse("atan", f64::atan, args, ctx) },
    "log"       => { arity: Arity::Range(1, 2), func: log::log },
    "rgba"      => { arity: Arity::Range(3, 4), func: builtin::rgba },
}

/// Function names that are not evaluated: a call renders back to its own
/// call syntax, e.g. `var(--x)` or `linear-gradient(...)`.
pub const UNINTERPRETED_FUNCTIONS: &[&str] = &["linear-gradient",
                                               "radial-gradient",
                                               "conic-gradient",
                                               "repeating-linear-gradient",
                                               "repeating-radial-gradient",
                                               "var",
                                               "calc",
                                               "clamp",
                                               "env",
                                               "url",
                                               "attr",
                                               "cubic-bezier",
                                               "steps",
                                               "translate",
                                               "translatex",
                                               "translatey",
                                               "rotate",
                                               "scale",
                                               "skew",
                                               "matrix",
                                               "blur",
                                               "drop-shadow",
                                               "brightness",
                                               "contrast",
                                               "saturate"];

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    const fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::Range(min, max) => n >= min && n <= max,
            Self::AtLeast(min) => n >= min,
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Exact(m) => m.to_string(),
            Self::Range(min, max) => format!("{min} to {max}"),
            Self::AtLeast(min) => format!("at least {min}"),
        }
    }
}

impl Evaluator {
    /// Evaluates a function call.
    ///
    /// Names are matched case-insensitively, first against the builtins,
    /// then against the initializers of the registered color formats, then
    /// against the uninterpreted CSS functions.
    ///
    /// # Parameters
    /// - `name`: Function name as written.
    /// - `arguments`: Unevaluated argument expressions.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The function result or an error if lookup or arity fails.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use tokenscript::{interpret, interpreter::value::core::Value};
    ///
    /// let references = HashMap::from([("angle".to_string(), Value::with_unit(90.0, "deg"))]);
    /// let value = interpret("linear-gradient({angle}, to right)", references, None).unwrap();
    /// assert_eq!(value.to_string(), "linear-gradient(90deg, to right)");
    ///
    /// assert!(interpret("nope(1)", HashMap::new(), None).is_err());
    /// ```
    pub(crate) fn eval_function_call(&mut self,
                                     name: &str,
                                     arguments: &[Node],
                                     line: usize)
                                     -> EvalResult<Value> {
        let key = name.to_lowercase();

        if let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == key) {
            if !builtin.arity.check(arguments.len()) {
                return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                                 expected: builtin.arity.describe(),
                                                                 found: arguments.len(),
                                                                 line });
            }
            let arguments = self.eval_arguments(arguments)?;
            let context = CallContext { line,
                                        config: &self.config };
            trace!(function = builtin.name, arguments = arguments.len(), "calling builtin");
            return (builtin.func)(&arguments, &context);
        }

        if self.config.colors.has_initializer(&key) {
            let arguments = self.eval_arguments(arguments)?;
            return self.config.colors.initialize(&key, arguments, &self.config, line);
        }

        if UNINTERPRETED_FUNCTIONS.contains(&key.as_str()) {
            let rendered = arguments.iter()
                                    .map(|argument| self.eval_uninterpreted(argument))
                                    .collect::<EvalResult<Vec<_>>>()?;
            return Ok(Value::string(format!("{name}({})", rendered.join(", "))));
        }

        Err(RuntimeError::UnknownFunction { name: name.to_string(),
                                            line })
    }

    /// Renders one argument of an uninterpreted function.
    ///
    /// Arguments that evaluate are rendered as values; bare CSS words such
    /// as `to right` or `--gap`, which name no variable, are kept as
    /// written.
    fn eval_uninterpreted(&mut self, argument: &Node) -> EvalResult<String> {
        match self.eval_expression(argument) {
            Ok(value) => value.render(&self.config, argument.line_number()),
            Err(RuntimeError::UnknownVariable { .. }) => Ok(argument.to_string()),
            Err(error) => Err(error),
        }
    }
}
