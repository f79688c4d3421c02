use tracing::trace;

use crate::{
    config::Config,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// How a declared parameter participates in arity checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Must be supplied.
    Required,
    /// May be omitted.
    Optional,
    /// Collects every remaining argument; only valid as the last parameter.
    Rest,
}

/// A declared method parameter.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    /// The parameter name, used in documentation and errors.
    pub name: &'static str,
    /// Whether the parameter is required, optional, or unpack-rest.
    pub kind: ParamKind,
}

impl Param {
    /// A parameter that must be supplied.
    #[must_use]
    pub const fn required(name: &'static str) -> Self {
        Self { name,
               kind: ParamKind::Required }
    }

    /// A parameter that may be omitted.
    #[must_use]
    pub const fn optional(name: &'static str) -> Self {
        Self { name,
               kind: ParamKind::Optional }
    }

    /// A trailing parameter collecting all remaining arguments.
    #[must_use]
    pub const fn rest(name: &'static str) -> Self {
        Self { name,
               kind: ParamKind::Rest }
    }
}

/// Everything a method implementation may need besides its arguments.
#[derive(Clone, Copy)]
pub struct CallContext<'a> {
    /// The source line of the call, for errors.
    pub line:   usize,
    /// The active configuration, for color rendering and conversions.
    pub config: &'a Config,
}

/// Type alias for method handlers.
///
/// A method receives its receiver mutably, so collection methods can update
/// it in place, plus the evaluated arguments.
pub type MethodFn<T> = fn(&mut T, Vec<Value>, &CallContext) -> EvalResult<Value>;

/// One entry of a method table.
pub struct MethodDef<T: 'static> {
    /// The method name as called from source.
    pub name:    &'static str,
    /// Declared parameters, in order.
    pub params:  &'static [Param],
    /// The declared return type name.
    pub returns: &'static str,
    /// The implementation.
    pub func:    MethodFn<T>,
}

impl<T: 'static> MethodDef<T> {
    /// Checks `found` arguments against the declared parameters.
    ///
    /// Required parameters must all be present; extra arguments are only
    /// accepted when the last parameter is unpack-rest.
    pub fn check_arity(&self, found: usize, line: usize) -> EvalResult<()> {
        let required = self.params
                           .iter()
                           .filter(|p| p.kind == ParamKind::Required)
                           .count();
        let variadic = self.params
                           .last()
                           .is_some_and(|p| p.kind == ParamKind::Rest);
        let max = self.params
                      .iter()
                      .filter(|p| p.kind != ParamKind::Rest)
                      .count();

        if found < required || (!variadic && found > max) {
            let expected = if variadic {
                format!("at least {required}")
            } else if required == max {
                required.to_string()
            } else {
                format!("{required} to {max}")
            };
            return Err(RuntimeError::ArgumentCountMismatch { name: self.name.to_string(),
                                                             expected,
                                                             found,
                                                             line });
        }
        Ok(())
    }
}

/// Defines a method table for a symbol type.
///
/// Each entry provides:
/// - a string name,
/// - the declared parameters,
/// - the declared return type,
/// - a function pointer implementing the method.
///
/// The macro produces a `METHODS` static that the type's
/// [`SymbolType::methods`] returns.
macro_rules! method_table {
    (
        $symbol:ty;
        $(
            $name:literal ( $($param:expr),* ) -> $returns:literal => $func:expr
        ),* $(,)?
    ) => {
        static METHODS: &[$crate::interpreter::value::method::MethodDef<$symbol>] = &[
            $(
                $crate::interpreter::value::method::MethodDef {
                    name:    $name,
                    params:  &[$($param),*],
                    returns: $returns,
                    func:    $func,
                },
            )*
        ];
    };
}

pub(crate) use method_table;

/// The capabilities shared by every runtime value type.
///
/// Absent capabilities are checkable facts: `has_method` and
/// `has_attribute` answer before anything is called, and the default
/// attribute accessors report `UnknownAttribute`.
pub trait SymbolType: Sized + 'static {
    /// The type name as written in declarations.
    const TYPE_NAME: &'static str;

    /// The method table of this type.
    fn methods() -> &'static [MethodDef<Self>];

    /// Returns `true` for a value constructed by `empty()`.
    fn is_empty(&self) -> bool;

    /// Returns `true` if `name` is a readable attribute.
    fn has_attribute(&self, _name: &str) -> bool {
        false
    }

    /// Reads an attribute.
    fn get_attribute(&self, name: &str, line: usize) -> EvalResult<Value> {
        Err(RuntimeError::UnknownAttribute { type_name: Self::TYPE_NAME.to_string(),
                                             name: name.to_string(),
                                             line })
    }

    /// Writes an attribute.
    fn set_attribute(&mut self, name: &str, _value: Value, line: usize) -> EvalResult<()> {
        Err(RuntimeError::UnknownAttribute { type_name: Self::TYPE_NAME.to_string(),
                                             name: name.to_string(),
                                             line })
    }

    /// Returns `true` if the type has a method called `name`.
    fn has_method(name: &str) -> bool {
        Self::methods().iter().any(|def| def.name == name)
    }

    /// Calls a method after validating its arity.
    ///
    /// # Errors
    /// - `UnknownMethod` if the type has no such method.
    /// - `ArgumentCountMismatch` if the arguments do not fit the parameters.
    /// - Whatever the method itself reports.
    fn call_method(&mut self,
                   name: &str,
                   arguments: Vec<Value>,
                   context: &CallContext)
                   -> EvalResult<Value> {
        let Some(def) = Self::methods().iter().find(|def| def.name == name) else {
            return Err(RuntimeError::UnknownMethod { type_name: Self::TYPE_NAME.to_string(),
                                                     name:      name.to_string(),
                                                     line:      context.line, });
        };
        def.check_arity(arguments.len(), context.line)?;

        trace!(type_name = Self::TYPE_NAME, method = def.name, returns = def.returns, "calling method");
        (def.func)(self, arguments, context)
    }
}
