use std::fmt;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::Value,
            method::{CallContext, MethodDef, Param, SymbolType, method_table},
        },
    },
    util::num::{f64_to_i64_checked, format_number},
};

/// A plain number.
///
/// `is_float` only affects display: a number written as `1.0` keeps its
/// decimal point when printed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberSymbol {
    /// The value, `None` when declared without an initializer.
    pub value:    Option<f64>,
    /// Whether the number prints with at least one decimal digit.
    pub is_float: bool,
}

impl NumberSymbol {
    /// A number that displays without a forced decimal point.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self { value:    Some(value),
               is_float: false, }
    }

    /// A number that displays with at least one decimal digit.
    #[must_use]
    pub const fn float(value: f64) -> Self {
        Self { value:    Some(value),
               is_float: true, }
    }

    /// The empty number.
    #[must_use]
    pub const fn empty() -> Self {
        Self { value:    None,
               is_float: false, }
    }
}

impl fmt::Display for NumberSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}", format_number(value, self.is_float)),
            None => Ok(()),
        }
    }
}

method_table! {
    NumberSymbol;
    "to_string"(Param::optional("radix")) -> "String" => to_string,
    "to_fixed"(Param::required("digits")) -> "String" => to_fixed,
    "is_integer"() -> "Boolean" => is_integer,
}

impl SymbolType for NumberSymbol {
    const TYPE_NAME: &'static str = "Number";

    fn methods() -> &'static [MethodDef<Self>] {
        METHODS
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

fn value_of(number: &NumberSymbol, line: usize) -> EvalResult<f64> {
    number.value
          .ok_or_else(|| RuntimeError::TypeError { details: "the number has no value".to_string(),
                                                   line })
}

/// Formats the number, in base 10 by default.
///
/// Any other radix from 2 to 36 needs an integral value.
fn to_string(number: &mut NumberSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let value = value_of(number, ctx.line)?;
    let Some(radix) = args.first() else {
        return Ok(Value::string(number.to_string()));
    };

    let radix = radix.as_integer(ctx.line)?;
    if radix == 10 {
        return Ok(Value::string(number.to_string()));
    }
    let radix = u32::try_from(radix).ok()
                                    .filter(|r| (2..=36).contains(r))
                                    .ok_or_else(|| RuntimeError::InvalidArgument {
                                        details: format!("radix must be between 2 and 36, found {radix}"),
                                        line: ctx.line,
                                    })?;

    let integer = f64_to_i64_checked(value, ctx.line)?;
    Ok(Value::string(to_radix(integer, radix)))
}

fn to_radix(value: i64, radix: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    let mut rest = value.unsigned_abs();
    let radix = u64::from(radix);
    while rest > 0 {
        // Bounded by the radix, so always a valid digit.
        let digit = u32::try_from(rest % radix).unwrap_or(0);
        digits.push(char::from_digit(digit, 36).unwrap_or('0'));
        rest /= radix;
    }
    if value < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

fn to_fixed(number: &mut NumberSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let value = value_of(number, ctx.line)?;
    let digits = args[0].as_integer(ctx.line)?;
    let digits = usize::try_from(digits).ok()
                                        .filter(|d| *d <= 100)
                                        .ok_or_else(|| RuntimeError::InvalidArgument {
                                            details: format!("digits must be between 0 and 100, found {digits}"),
                                            line: ctx.line,
                                        })?;
    Ok(Value::string(format!("{value:.digits$}")))
}

fn is_integer(number: &mut NumberSymbol, _: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let value = value_of(number, ctx.line)?;
    Ok(Value::from(value.is_finite() && value.fract() == 0.0))
}
