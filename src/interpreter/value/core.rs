use std::{collections::BTreeMap, fmt};

use crate::{
    ast::TypeDecl,
    config::Config,
    error::RuntimeError,
    interpreter::{
        colors::ColorManager,
        evaluator::core::EvalResult,
        units::Quantity,
        value::{
            boolean::BooleanSymbol,
            color::{ColorSymbol, HEX_FORMAT, is_hex_color},
            dictionary::DictionarySymbol,
            list::{ListSymbol, join_list},
            method::{CallContext, SymbolType},
            number::NumberSymbol,
            string::StringSymbol,
            unit::UnitSymbol,
        },
    },
    util::num::f64_to_i64_checked,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types that can appear in expressions,
/// declarations, method returns, and conditions. Every variant except
/// `Null` may hold an empty payload, produced by its `empty()` constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A plain number.
    Number(NumberSymbol),
    /// A string.
    String(StringSymbol),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison and logical operators and required by `if`
    /// and `while` conditions.
    Boolean(BooleanSymbol),
    /// A number with a fixed unit, e.g. `16px`.
    NumberWithUnit(UnitSymbol),
    /// A hex color or a color in a registered format.
    Color(ColorSymbol),
    /// An ordered, mutable list.
    List(ListSymbol),
    /// A mutable string-keyed map.
    Dictionary(DictionarySymbol),
    /// The placeholder for "no value".
    Null,
}

/// Runs `$body` with `$symbol` bound to the payload of any non-null
/// variant, or evaluates `$null` for [`Value::Null`].
macro_rules! with_symbol {
    ($value:expr, $symbol:ident => $body:expr, null => $null:expr) => {
        match $value {
            Value::Number($symbol) => $body,
            Value::String($symbol) => $body,
            Value::Boolean($symbol) => $body,
            Value::NumberWithUnit($symbol) => $body,
            Value::Color($symbol) => $body,
            Value::List($symbol) => $body,
            Value::Dictionary($symbol) => $body,
            Value::Null => $null,
        }
    };
}

fn type_has_method<T: SymbolType>(_: &T, name: &str) -> bool {
    T::has_method(name)
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(BooleanSymbol::new(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::string(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(StringSymbol::new(v))
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        match q.unit {
            Some(unit) => Self::NumberWithUnit(UnitSymbol::new(q.value, unit)),
            None => Self::number(q.value),
        }
    }
}

impl Value {
    /// A plain integral-style number.
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self::Number(NumberSymbol::new(value))
    }

    /// A string.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(StringSymbol::new(value.into()))
    }

    /// A number with a unit.
    #[must_use]
    pub fn with_unit(value: f64, unit: &str) -> Self {
        Self::NumberWithUnit(UnitSymbol::new(value, unit.to_string()))
    }

    /// A hex color, e.g. `#ff0000`.
    #[must_use]
    pub fn hex(value: &str) -> Self {
        Self::Color(ColorSymbol::hex(value))
    }

    /// A list of values.
    #[must_use]
    pub const fn list(elements: Vec<Self>, implicit: bool) -> Self {
        Self::List(ListSymbol::new(elements, implicit))
    }

    /// A dictionary.
    #[must_use]
    pub const fn dictionary(entries: BTreeMap<String, Self>) -> Self {
        Self::Dictionary(DictionarySymbol::new(entries))
    }

    /// Returns the type name, e.g. `NumberWithUnit`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => NumberSymbol::TYPE_NAME,
            Self::String(_) => StringSymbol::TYPE_NAME,
            Self::Boolean(_) => BooleanSymbol::TYPE_NAME,
            Self::NumberWithUnit(_) => UnitSymbol::TYPE_NAME,
            Self::Color(_) => ColorSymbol::TYPE_NAME,
            Self::List(_) => ListSymbol::TYPE_NAME,
            Self::Dictionary(_) => DictionarySymbol::TYPE_NAME,
            Self::Null => "Null",
        }
    }

    /// Returns the type name including a color's subtype, e.g.
    /// `Color.Hex`.
    #[must_use]
    pub fn type_label(&self) -> String {
        match self {
            Self::Color(color) => format!("Color.{}", color.subtype),
            other => other.type_name().to_string(),
        }
    }

    /// Returns `true` for a value built by `empty()`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        with_symbol!(self, s => s.is_empty(), null => false)
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value's type has a method called `name`.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        with_symbol!(self, s => type_has_method(s, name), null => false)
    }

    /// Calls a method on the value, possibly mutating it.
    ///
    /// # Errors
    /// - `UnknownMethod` for `Null` or an unknown method name.
    /// - `EmptyResult` if the method produced an empty value.
    pub fn call_method(&mut self,
                       name: &str,
                       arguments: Vec<Self>,
                       context: &CallContext)
                       -> EvalResult<Self> {
        let result = with_symbol!(self,
                                  s => s.call_method(name, arguments, context),
                                  null => Err(RuntimeError::UnknownMethod { type_name: "Null".to_string(),
                                                                            name:      name.to_string(),
                                                                            line:      context.line, }))?;
        if result.is_empty() {
            return Err(RuntimeError::EmptyResult { name: name.to_string(),
                                                   line: context.line, });
        }
        Ok(result)
    }

    /// Returns `true` if the value has a readable attribute `name`.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        with_symbol!(self, s => s.has_attribute(name), null => false)
    }

    /// Reads attribute `name`.
    pub fn get_attribute(&self, name: &str, line: usize) -> EvalResult<Self> {
        with_symbol!(self,
                     s => s.get_attribute(name, line),
                     null => Err(RuntimeError::UnknownAttribute { type_name: "Null".to_string(),
                                                                  name: name.to_string(),
                                                                  line }))
    }

    /// Writes attribute `name`.
    pub fn set_attribute(&mut self, name: &str, value: Self, line: usize) -> EvalResult<()> {
        with_symbol!(self,
                     s => s.set_attribute(name, value, line),
                     null => Err(RuntimeError::UnknownAttribute { type_name: "Null".to_string(),
                                                                  name: name.to_string(),
                                                                  line }))
    }

    /// Borrows a nested value mutably, for in-place updates through an
    /// attribute path.
    ///
    /// Only dictionaries and channel colors hold nested values.
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Self> {
        match self {
            Self::Dictionary(dictionary) => dictionary.entries.as_mut()?.get_mut(name),
            Self::Color(color) => color.channel_mut(name),
            _ => None,
        }
    }

    /// Compares type and payload.
    ///
    /// Numbers compare by value regardless of how they were written, so
    /// `1.0` equals `1`. Lists and dictionaries compare element-wise.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.value == b.value,
            (Self::NumberWithUnit(a), Self::NumberWithUnit(b)) => {
                a.value == b.value && a.unit == b.unit
            },
            (Self::List(a), Self::List(b)) => match (&a.elements, &b.elements) {
                (Some(a), Some(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
                },
                (a, b) => a.is_none() && b.is_none(),
            },
            (Self::Dictionary(a), Self::Dictionary(b)) => match (&a.entries, &b.entries) {
                (Some(a), Some(b)) => {
                    a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.get(key).is_some_and(|other| value.equals(other)))
                },
                (a, b) => a.is_none() && b.is_none(),
            },
            (a, b) => a == b,
        }
    }

    /// Returns the coarse type used to check reassignments.
    ///
    /// Colors of any format are interchangeable here.
    #[must_use]
    pub const fn kind(&self) -> ValueType {
        match self {
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::Boolean(_) => ValueType::Boolean,
            Self::NumberWithUnit(_) => ValueType::NumberWithUnit,
            Self::Color(_) => ValueType::Color(None),
            Self::List(_) => ValueType::List,
            Self::Dictionary(_) => ValueType::Dictionary,
            Self::Null => ValueType::Null,
        }
    }

    /// Returns `true` if `candidate` may replace `self` in a reassignment.
    #[must_use]
    pub fn valid_value(&self, candidate: &Self) -> bool {
        self.kind().matches(candidate)
        || candidate.is_null()
        || candidate.is_empty()
        || candidate.clone().coerce_to(&self.kind(), 0).is_ok()
    }

    /// Converts the value to `target`.
    ///
    /// Values already of the target type pass through. Empty values and
    /// `Null` become the target's empty value. A hex-shaped string becomes a
    /// hex color. Anything else is a type error.
    ///
    /// # Example
    /// ```
    /// use tokenscript::interpreter::value::core::{Value, ValueType};
    ///
    /// let color = Value::string("#fff").coerce_to(&ValueType::Color(None), 1).unwrap();
    /// assert_eq!(color, Value::hex("#fff"));
    ///
    /// assert!(Value::number(1.0).coerce_to(&ValueType::String, 1).is_err());
    /// ```
    pub fn coerce_to(self, target: &ValueType, line: usize) -> EvalResult<Self> {
        if target.matches(&self) {
            return Ok(self);
        }
        if self.is_null() || self.is_empty() {
            return Ok(target.empty());
        }
        if let (ValueType::Color(subtype), Self::String(s)) = (target, &self)
           && subtype.as_deref()
                     .is_none_or(|sub| sub.eq_ignore_ascii_case(HEX_FORMAT))
           && let Some(text) = s.value.as_deref()
           && is_hex_color(text)
        {
            return Ok(Self::hex(text));
        }
        Err(RuntimeError::TypeError { details: format!("expected {target}, found {}",
                                                       self.type_label()),
                                      line })
    }

    /// Reads a plain number.
    pub fn as_number(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Number(NumberSymbol { value: Some(v), .. }) => Ok(*v),
            other => Err(expected("Number", other, line)),
        }
    }

    /// Reads a plain integral number.
    pub fn as_integer(&self, line: usize) -> EvalResult<i64> {
        f64_to_i64_checked(self.as_number(line)?, line)
    }

    /// Reads a number with or without a unit.
    pub fn as_quantity(&self, line: usize) -> EvalResult<Quantity> {
        match self {
            Self::Number(NumberSymbol { value: Some(v), .. }) => Ok(Quantity::plain(*v)),
            Self::NumberWithUnit(UnitSymbol { value: Some(v), unit }) => {
                Ok(Quantity::with_unit(*v, unit))
            },
            other => Err(expected("Number or NumberWithUnit", other, line)),
        }
    }

    /// Reads a string.
    pub fn as_str(&self, line: usize) -> EvalResult<&str> {
        match self {
            Self::String(StringSymbol { value: Some(s) }) => Ok(s),
            other => Err(expected("String", other, line)),
        }
    }

    /// Reads a boolean.
    pub fn as_bool(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Boolean(BooleanSymbol { value: Some(b) }) => Ok(*b),
            other => Err(expected("Boolean", other, line)),
        }
    }

    /// Renders the value as text, colors included.
    ///
    /// Colors in a registered format are rendered by the format's stringify
    /// script, so this needs the active configuration; everything else uses
    /// [`Display`](fmt::Display). Script failures are reported on `line`.
    pub fn render(&self, config: &Config, line: usize) -> EvalResult<String> {
        match self {
            Self::Color(color) => config.colors.stringify(color, config, line),
            Self::List(list) => {
                let parts = list.elements
                                .iter()
                                .flatten()
                                .map(|element| element.render(config, line))
                                .collect::<EvalResult<Vec<_>>>()?;
                Ok(join_list(&parts, list.implicit))
            },
            Self::Dictionary(dictionary) => {
                let parts = dictionary.entries
                                      .iter()
                                      .flatten()
                                      .map(|(key, value)| Ok(format!("{key}: {}", value.render(config, line)?)))
                                      .collect::<EvalResult<Vec<_>>>()?;
                Ok(format!("{{{}}}", parts.join(", ")))
            },
            other => Ok(other.to_string()),
        }
    }
}

fn expected(type_name: &str, found: &Value, line: usize) -> RuntimeError {
    let found = if found.is_empty() {
        format!("an empty {}", found.type_label())
    } else {
        found.type_label()
    };
    RuntimeError::TypeError { details: format!("expected {type_name}, found {found}"),
                              line }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_symbol!(self, s => write!(f, "{s}"), null => write!(f, "null"))
    }
}

/// A type as named in a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// `Number`
    Number,
    /// `String`
    String,
    /// `Boolean`
    Boolean,
    /// `NumberWithUnit`
    NumberWithUnit,
    /// `Color`, optionally restricted to one format.
    Color(Option<String>),
    /// `List`
    List,
    /// `Dictionary`
    Dictionary,
    /// The type of `Null`; never declarable.
    Null,
}

impl ValueType {
    /// Resolves a declared type, case-insensitively.
    ///
    /// `Color.<Format>` must name `Hex` or a format registered in `colors`;
    /// the subtype is normalized to the format's registered name.
    ///
    /// # Example
    /// ```
    /// use tokenscript::{
    ///     ast::TypeDecl,
    ///     interpreter::{colors::ColorManager, value::core::ValueType},
    /// };
    ///
    /// let colors = ColorManager::new();
    /// let decl = TypeDecl { base:    "color".to_string(),
    ///                       subtype: Some("HEX".to_string()), };
    ///
    /// assert_eq!(ValueType::resolve(&decl, &colors, 1).unwrap(),
    ///            ValueType::Color(Some("Hex".to_string())));
    /// ```
    pub fn resolve(decl: &TypeDecl, colors: &ColorManager, line: usize) -> EvalResult<Self> {
        let unknown = || RuntimeError::UnknownType { name: decl.to_string(),
                                                     line };
        let base = decl.base.to_ascii_lowercase();

        if base == "color" {
            return match &decl.subtype {
                None => Ok(Self::Color(None)),
                Some(sub) if sub.eq_ignore_ascii_case(HEX_FORMAT) => {
                    Ok(Self::Color(Some(HEX_FORMAT.to_string())))
                },
                Some(sub) => colors.format_by_name(sub)
                                   .map(|format| Self::Color(Some(format.name.clone())))
                                   .ok_or_else(unknown),
            };
        }
        if decl.subtype.is_some() {
            return Err(unknown());
        }

        match base.as_str() {
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "boolean" => Ok(Self::Boolean),
            "numberwithunit" => Ok(Self::NumberWithUnit),
            "list" => Ok(Self::List),
            "dictionary" => Ok(Self::Dictionary),
            _ => Err(unknown()),
        }
    }

    /// Returns `true` if `value` is of this type.
    ///
    /// List elements are not checked.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Number, Value::Number(_))
            | (Self::String, Value::String(_))
            | (Self::Boolean, Value::Boolean(_))
            | (Self::NumberWithUnit, Value::NumberWithUnit(_))
            | (Self::Color(None), Value::Color(_))
            | (Self::List, Value::List(_))
            | (Self::Dictionary, Value::Dictionary(_))
            | (Self::Null, Value::Null) => true,
            (Self::Color(Some(subtype)), Value::Color(color)) => {
                color.subtype.eq_ignore_ascii_case(subtype)
            },
            _ => false,
        }
    }

    /// Returns this type's empty value.
    #[must_use]
    pub fn empty(&self) -> Value {
        match self {
            Self::Number => Value::Number(NumberSymbol::empty()),
            Self::String => Value::String(StringSymbol::empty()),
            Self::Boolean => Value::Boolean(BooleanSymbol::empty()),
            Self::NumberWithUnit => Value::NumberWithUnit(UnitSymbol::empty()),
            Self::Color(subtype) => {
                Value::Color(ColorSymbol::empty(subtype.as_deref().unwrap_or(HEX_FORMAT)))
            },
            Self::List => Value::List(ListSymbol::empty()),
            Self::Dictionary => Value::Dictionary(DictionarySymbol::empty()),
            Self::Null => Value::Null,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "Number"),
            Self::String => write!(f, "String"),
            Self::Boolean => write!(f, "Boolean"),
            Self::NumberWithUnit => write!(f, "NumberWithUnit"),
            Self::Color(Some(subtype)) => write!(f, "Color.{subtype}"),
            Self::Color(None) => write!(f, "Color"),
            Self::List => write!(f, "List"),
            Self::Dictionary => write!(f, "Dictionary"),
            Self::Null => write!(f, "Null"),
        }
    }
}
