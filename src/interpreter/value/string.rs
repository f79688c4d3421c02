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
    util::num::{f64_to_i64_checked, usize_to_f64},
};

/// A string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSymbol {
    /// The text, `None` when declared without an initializer.
    pub value: Option<String>,
}

impl StringSymbol {
    /// A string holding `value`.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self { value: Some(value) }
    }

    /// The empty string value, distinct from `""`.
    #[must_use]
    pub const fn empty() -> Self {
        Self { value: None }
    }
}

impl fmt::Display for StringSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.as_deref().unwrap_or_default())
    }
}

method_table! {
    StringSymbol;
    "length"() -> "Number" => length,
    "upper"() -> "String" => upper,
    "lower"() -> "String" => lower,
    "trim"() -> "String" => trim,
    "concat"(Param::rest("parts")) -> "String" => concat,
    "split"(Param::optional("separator")) -> "List" => split,
    "replace"(Param::required("from"), Param::required("to")) -> "String" => replace,
    "slice"(Param::required("start"), Param::optional("end")) -> "String" => slice,
    "starts_with"(Param::required("prefix")) -> "Boolean" => starts_with,
    "ends_with"(Param::required("suffix")) -> "Boolean" => ends_with,
    "contains"(Param::required("needle")) -> "Boolean" => contains,
    "pad_start"(Param::required("length"), Param::optional("fill")) -> "String" => pad_start,
    "to_number"() -> "Number" => to_number,
    "to_string"() -> "String" => to_string,
}

impl SymbolType for StringSymbol {
    const TYPE_NAME: &'static str = "String";

    fn methods() -> &'static [MethodDef<Self>] {
        METHODS
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

fn text(string: &StringSymbol) -> &str {
    string.value.as_deref().unwrap_or_default()
}

fn length(string: &mut StringSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::number(usize_to_f64(text(string).chars().count())))
}

fn upper(string: &mut StringSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(text(string).to_uppercase()))
}

fn lower(string: &mut StringSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(text(string).to_lowercase()))
}

fn trim(string: &mut StringSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(text(string).trim()))
}

/// Appends the rendered form of every argument.
fn concat(string: &mut StringSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let mut result = text(string).to_string();
    for part in &args {
        result.push_str(&part.render(ctx.config, ctx.line)?);
    }
    Ok(Value::string(result))
}

/// Splits on `separator`, or on runs of whitespace when none is given.
fn split(string: &mut StringSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let source = text(string);
    let parts: Vec<Value> = match args.first() {
        None => source.split_whitespace().map(Value::string).collect(),
        Some(separator) => {
            let separator = separator.as_str(ctx.line)?;
            if separator.is_empty() {
                source.chars().map(|c| Value::string(c.to_string())).collect()
            } else {
                source.split(separator).map(Value::string).collect()
            }
        },
    };
    Ok(Value::list(parts, false))
}

fn replace(string: &mut StringSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let from = args[0].as_str(ctx.line)?;
    let to = args[1].as_str(ctx.line)?;
    Ok(Value::string(text(string).replace(from, to)))
}

/// Extracts the characters from `start` up to, not including, `end`.
///
/// Negative positions count from the end and out-of-range positions are
/// clamped, so `slice` never fails on a valid integer.
fn slice(string: &mut StringSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let chars: Vec<char> = text(string).chars().collect();
    let length = i64::try_from(chars.len()).unwrap_or(i64::MAX);

    let clamp = |position: i64| -> usize {
        let position = if position < 0 { length + position } else { position };
        usize::try_from(position.clamp(0, length)).unwrap_or(0)
    };
    let start = clamp(f64_to_i64_checked(args[0].as_number(ctx.line)?, ctx.line)?);
    let end = match args.get(1) {
        Some(end) => clamp(f64_to_i64_checked(end.as_number(ctx.line)?, ctx.line)?),
        None => chars.len(),
    };

    if start >= end {
        return Ok(Value::string(""));
    }
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

fn starts_with(string: &mut StringSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    Ok(Value::from(text(string).starts_with(args[0].as_str(ctx.line)?)))
}

fn ends_with(string: &mut StringSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    Ok(Value::from(text(string).ends_with(args[0].as_str(ctx.line)?)))
}

fn contains(string: &mut StringSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    Ok(Value::from(text(string).contains(args[0].as_str(ctx.line)?)))
}

/// Pads the start with `fill` (a space by default) up to `length`
/// characters.
fn pad_start(string: &mut StringSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let target = usize::try_from(args[0].as_integer(ctx.line)?).unwrap_or(0);
    let fill = match args.get(1) {
        Some(fill) => fill.as_str(ctx.line)?,
        None => " ",
    };
    let source = text(string);
    let current = source.chars().count();

    if fill.is_empty() || current >= target {
        return Ok(Value::string(source));
    }
    let padding: String = fill.chars().cycle().take(target - current).collect();
    Ok(Value::string(padding + source))
}

/// Parses the trimmed text as a number.
fn to_number(string: &mut StringSymbol, _: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let source = text(string).trim();
    source.parse::<f64>()
          .ok()
          .filter(|value| value.is_finite())
          .map(Value::number)
          .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("'{source}' is not a number"),
                                                         line:    ctx.line, })
}

fn to_string(string: &mut StringSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(text(string)))
}
