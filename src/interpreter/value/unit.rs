use std::fmt;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::Value,
            method::{CallContext, MethodDef, SymbolType, method_table},
        },
    },
    util::num::format_number,
};

/// A number carrying a unit, e.g. `16px`.
///
/// The unit is fixed when the value is built; arithmetic always produces a
/// new value.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSymbol {
    /// The value, `None` when declared without an initializer.
    pub value: Option<f64>,
    /// The unit keyword, as registered.
    pub unit:  String,
}

impl UnitSymbol {
    /// A number with a unit.
    #[must_use]
    pub const fn new(value: f64, unit: String) -> Self {
        Self { value: Some(value),
               unit }
    }

    /// The empty value, which has no unit yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self { value: None,
               unit:  String::new(), }
    }
}

impl fmt::Display for UnitSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}{}", format_number(value, false), self.unit),
            None => Ok(()),
        }
    }
}

method_table! {
    UnitSymbol;
    "to_string"() -> "String" => to_string,
    "to_number"() -> "Number" => to_number,
    "unit"() -> "String" => unit,
}

impl SymbolType for UnitSymbol {
    const TYPE_NAME: &'static str = "NumberWithUnit";

    fn methods() -> &'static [MethodDef<Self>] {
        METHODS
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

fn to_string(symbol: &mut UnitSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(symbol.to_string()))
}

/// Drops the unit.
fn to_number(symbol: &mut UnitSymbol, _: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    symbol.value
          .map(Value::number)
          .ok_or_else(|| RuntimeError::TypeError { details: "the number has no value".to_string(),
                                                   line:    ctx.line, })
}

fn unit(symbol: &mut UnitSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(symbol.unit.as_str()))
}
