use std::{collections::BTreeMap, fmt};

use crate::{
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::Value,
            method::{CallContext, MethodDef, Param, SymbolType, method_table},
        },
    },
    util::num::usize_to_f64,
};

/// A mutable map from string keys to values, iterated in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionarySymbol {
    /// The entries, `None` when declared without an initializer.
    pub entries: Option<BTreeMap<String, Value>>,
}

impl DictionarySymbol {
    /// A dictionary holding `entries`.
    #[must_use]
    pub const fn new(entries: BTreeMap<String, Value>) -> Self {
        Self { entries: Some(entries) }
    }

    /// The empty dictionary value.
    #[must_use]
    pub const fn empty() -> Self {
        Self { entries: None }
    }

    fn map(&self) -> Option<&BTreeMap<String, Value>> {
        self.entries.as_ref()
    }

    fn map_mut(&mut self) -> &mut BTreeMap<String, Value> {
        self.entries.get_or_insert_with(BTreeMap::new)
    }
}

impl fmt::Display for DictionarySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(entries) = self.map() else {
            return Ok(());
        };
        let parts = entries.iter()
                           .map(|(key, value)| format!("{key}: {value}"))
                           .collect::<Vec<_>>();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

method_table! {
    DictionarySymbol;
    "get"(Param::required("key")) -> "Any" => get,
    "set"(Param::required("key"), Param::required("value")) -> "Dictionary" => set,
    "delete"(Param::required("key")) -> "Dictionary" => delete,
    "keys"() -> "List" => keys,
    "values"() -> "List" => values,
    "length"() -> "Number" => length,
    "key_exists"(Param::required("key")) -> "Boolean" => key_exists,
    "clear"() -> "Dictionary" => clear,
    "to_string"() -> "String" => to_string,
}

impl SymbolType for DictionarySymbol {
    const TYPE_NAME: &'static str = "Dictionary";

    fn methods() -> &'static [MethodDef<Self>] {
        METHODS
    }

    fn is_empty(&self) -> bool {
        self.entries.is_none()
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.map().is_some_and(|entries| entries.contains_key(name))
    }

    /// Keys read as attributes; a missing key reads as `Null`.
    fn get_attribute(&self, name: &str, _line: usize) -> EvalResult<Value> {
        Ok(self.map()
               .and_then(|entries| entries.get(name))
               .cloned()
               .unwrap_or(Value::Null))
    }

    fn set_attribute(&mut self, name: &str, value: Value, _line: usize) -> EvalResult<()> {
        self.map_mut().insert(name.to_string(), value);
        Ok(())
    }
}

fn key(args: &[Value], ctx: &CallContext) -> EvalResult<String> {
    Ok(args[0].as_str(ctx.line)?.to_string())
}

/// Returns the value under `key`, or `Null`.
fn get(dictionary: &mut DictionarySymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    dictionary.get_attribute(&key(&args, ctx)?, ctx.line)
}

fn set(dictionary: &mut DictionarySymbol, mut args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let value = args.pop().unwrap_or(Value::Null);
    let key = key(&args, ctx)?;
    dictionary.map_mut().insert(key, value);
    Ok(Value::Dictionary(dictionary.clone()))
}

fn delete(dictionary: &mut DictionarySymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let key = key(&args, ctx)?;
    dictionary.map_mut().remove(&key);
    Ok(Value::Dictionary(dictionary.clone()))
}

fn keys(dictionary: &mut DictionarySymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    let keys = dictionary.map()
                         .into_iter()
                         .flat_map(BTreeMap::keys)
                         .map(|key| Value::string(key.as_str()))
                         .collect();
    Ok(Value::list(keys, false))
}

fn values(dictionary: &mut DictionarySymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    let values = dictionary.map()
                           .into_iter()
                           .flat_map(BTreeMap::values)
                           .cloned()
                           .collect();
    Ok(Value::list(values, false))
}

fn length(dictionary: &mut DictionarySymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    Ok(Value::number(usize_to_f64(dictionary.map().map_or(0, BTreeMap::len))))
}

fn key_exists(dictionary: &mut DictionarySymbol, args: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let key = key(&args, ctx)?;
    Ok(Value::from(dictionary.has_attribute(&key)))
}

fn clear(dictionary: &mut DictionarySymbol, _: Vec<Value>, _: &CallContext) -> EvalResult<Value> {
    dictionary.map_mut().clear();
    Ok(Value::Dictionary(dictionary.clone()))
}

fn to_string(dictionary: &mut DictionarySymbol, _: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    Ok(Value::string(Value::Dictionary(dictionary.clone()).render(ctx.config, ctx.line)?))
}
