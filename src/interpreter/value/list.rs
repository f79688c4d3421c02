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
    util::num::{f64_to_i64_checked, resolve_index, usize_to_f64},
};

/// An ordered, mutable list.
///
/// `implicit` lists come from space-separated source (`1px solid red`) and
/// render space-joined; explicit lists render comma-joined.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSymbol {
    /// The elements, `None` when declared without an initializer.
    pub elements: Option<Vec<Value>>,
    /// Whether the list renders space-joined.
    pub implicit: bool,
}

impl ListSymbol {
    /// A list holding `elements`.
    #[must_use]
    pub const fn new(elements: Vec<Value>, implicit: bool) -> Self {
        Self { elements: Some(elements),
               implicit }
    }

    /// The empty list value.
    #[must_use]
    pub const fn empty() -> Self {
        Self { elements: None,
               implicit: false, }
    }

    fn items(&self) -> &[Value] {
        self.elements.as_deref().unwrap_or_default()
    }

    fn items_mut(&mut self) -> &mut Vec<Value> {
        self.elements.get_or_insert_with(Vec::new)
    }
}

/// Joins rendered list elements.
///
/// Explicit lists use `", "`. Implicit lists use a single space, except
/// where a neighbouring element already ends or starts with one.
///
/// # Example
/// ```
/// use tokenscript::interpreter::value::list::join_list;
///
/// let parts = ["a".to_string(), "b ".to_string(), "c".to_string()];
/// assert_eq!(join_list(&parts, false), "a, b , c");
/// assert_eq!(join_list(&parts, true), "a b c");
/// ```
#[must_use]
pub fn join_list(parts: &[String], implicit: bool) -> String {
    if !implicit {
        return parts.join(", ");
    }
    let mut result = String::new();
    for (index, part) in parts.iter().enumerate() {
        if index > 0 && !result.ends_with(' ') && !part.starts_with(' ') {
            result.push(' ');
        }
        result.push_str(part);
    }
    result
}

impl fmt::Display for ListSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.items().iter().map(ToString::to_string).collect::<Vec<_>>();
        write!(f, "{}", join_list(&parts, self.implicit))
    }
}

method_table! {
    ListSymbol;
    "length"() -> "Number" => length,
    "get"(Param::required("index")) -> "Any" => get,
    "update"(Param::required("index"), Param::required("value")) -> "List" => update,
    "append"(Param::rest("values")) -> "List" => append,
    "extend"(Param::required("list")) -> "List" => extend,
    "insert"(Param::required("index"), Param::required("value")) -> "List" => insert,
    "delete"(Param::required("index")) -> "List" => delete,
    "index"(Param::required("value")) -> "Number" => index,
    "join"(Param::optional("separator")) -> "String" => join,
    "first"() -> "Any" => first,
    "last"() -> "Any" => last,
    "reverse"() -> "List" => reverse,
    "to_string"() -> "String" => to_string,
}

impl SymbolType for ListSymbol {
    const TYPE_NAME: &'static str = "List";

    fn methods() -> &'static [MethodDef<Self>] {
        METHODS
    }

    fn is_empty(&self) -> bool {
        self.elements.is_none()
    }
}

fn length(list: &mut ListSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::number(usize_to_f64(list.items().len())))
}

fn get(list: &mut ListSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let position = resolve_index(args[0].as_number(ctx.line)?, list.items().len(), ctx.line)?;
    Ok(list.items()[position].clone())
}

fn update(list: &mut ListSymbol, mut args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let value = args.pop().unwrap_or(Value::Null);
    let position = resolve_index(args[0].as_number(ctx.line)?, list.items().len(), ctx.line)?;
    list.items_mut()[position] = value;
    Ok(Value::List(list.clone()))
}

fn append(list: &mut ListSymbol, args: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    list.items_mut().extend(args);
    Ok(Value::List(list.clone()))
}

fn extend(list: &mut ListSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    match args.into_iter().next() {
        Some(Value::List(other)) => {
            list.items_mut().extend(other.elements.unwrap_or_default());
            Ok(Value::List(list.clone()))
        },
        Some(other) => Err(RuntimeError::TypeError { details: format!("expected List, found {}",
                                                                      other.type_label()),
                                                     line:    ctx.line, }),
        None => Ok(Value::List(list.clone())),
    }
}

/// Inserts before `index`; an index equal to the length appends.
fn insert(list: &mut ListSymbol, mut args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let value = args.pop().unwrap_or(Value::Null);
    let length = list.items().len();
    let raw = f64_to_i64_checked(args[0].as_number(ctx.line)?, ctx.line)?;

    let position = if usize::try_from(raw).is_ok_and(|p| p == length) {
        length
    } else {
        resolve_index(args[0].as_number(ctx.line)?, length, ctx.line)?
    };
    list.items_mut().insert(position, value);
    Ok(Value::List(list.clone()))
}

fn delete(list: &mut ListSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let position = resolve_index(args[0].as_number(ctx.line)?, list.items().len(), ctx.line)?;
    list.items_mut().remove(position);
    Ok(Value::List(list.clone()))
}

/// Returns the position of the first equal element, or `-1`.
fn index(list: &mut ListSymbol, args: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    let position = list.items()
                       .iter()
                       .position(|element| element.equals(&args[0]))
                       .map_or(-1.0, usize_to_f64);
    Ok(Value::number(position))
}

fn join(list: &mut ListSymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let separator = match args.first() {
        Some(separator) => separator.as_str(ctx.line)?,
        None => ", ",
    };
    let parts = list.items()
                    .iter()
                    .map(|element| element.render(ctx.config, ctx.line))
                    .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::string(parts.join(separator)))
}

fn first(list: &mut ListSymbol, _: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    list.items()
        .first()
        .cloned()
        .ok_or(RuntimeError::IndexOutOfBounds { index:  0,
                                                length: 0,
                                                line:   ctx.line, })
}

fn last(list: &mut ListSymbol, _: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    list.items()
        .last()
        .cloned()
        .ok_or(RuntimeError::IndexOutOfBounds { index:  -1,
                                                length: 0,
                                                line:   ctx.line, })
}

fn reverse(list: &mut ListSymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    list.items_mut().reverse();
    Ok(Value::List(list.clone()))
}

fn to_string(list: &mut ListSymbol, _: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(Value::List(list.clone()).render(ctx.config, ctx.line)?))
}
