use std::fmt;

use crate::interpreter::{
    evaluator::core::EvalResult,
    value::{
        core::Value,
        method::{CallContext, MethodDef, SymbolType, method_table},
    },
};

/// A boolean value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanSymbol {
    /// The value, `None` when declared without an initializer.
    pub value: Option<bool>,
}

impl BooleanSymbol {
    /// `true` or `false`.
    #[must_use]
    pub const fn new(value: bool) -> Self {
        Self { value: Some(value) }
    }

    /// The empty boolean.
    #[must_use]
    pub const fn empty() -> Self {
        Self { value: None }
    }
}

impl fmt::Display for BooleanSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

method_table! {
    BooleanSymbol;
    "to_string"() -> "String" => to_string,
}

impl SymbolType for BooleanSymbol {
    const TYPE_NAME: &'static str = "Boolean";

    fn methods() -> &'static [MethodDef<Self>] {
        METHODS
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

fn to_string(boolean: &mut BooleanSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(boolean.to_string()))
}
