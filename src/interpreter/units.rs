use std::{collections::HashMap, f64::consts::PI};

use serde::Deserialize;
use tracing::debug;

use crate::{
    ast::BinaryOperator,
    error::{RuntimeError, SpecError},
    interpreter::evaluator::core::EvalResult,
};

/// How a unit relates to the rest of its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitKind {
    /// A fixed multiplier to the category's canonical unit.
    ///
    /// Units without a ratio (`em`, `vw`, ...) never convert; they only
    /// combine with themselves or with unitless numbers.
    Absolute {
        /// How many canonical units one of this unit is worth.
        ratio: Option<f64>,
    },
    /// A percentage-like unit resolved against a co-operand.
    Relative {
        /// Factor turning the written value into a fraction, `0.01` for `%`.
        scale: f64,
    },
}

/// A registered unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSpec {
    /// The keyword as written after a number, e.g. `px`.
    pub keyword:  String,
    /// A human-readable name.
    pub name:     String,
    /// The category, e.g. `length`. Units only convert within a category.
    pub category: String,
    /// Whether the unit is absolute or relative.
    pub kind:     UnitKind,
}

impl UnitSpec {
    fn absolute(keyword: &str, name: &str, category: &str, ratio: Option<f64>) -> Self {
        Self { keyword:  keyword.to_string(),
               name:     name.to_string(),
               category: category.to_string(),
               kind:     UnitKind::Absolute { ratio }, }
    }

    const fn ratio(&self) -> Option<f64> {
        match self.kind {
            UnitKind::Absolute { ratio } => ratio,
            UnitKind::Relative { .. } => None,
        }
    }

    const fn scale(&self) -> Option<f64> {
        match self.kind {
            UnitKind::Relative { scale } => Some(scale),
            UnitKind::Absolute { .. } => None,
        }
    }
}

/// A number with an optional unit, the operand of unit arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    /// The numeric value.
    pub value: f64,
    /// The unit keyword, `None` for a plain number.
    pub unit:  Option<String>,
}

impl Quantity {
    /// A plain number.
    #[must_use]
    pub const fn plain(value: f64) -> Self {
        Self { value, unit: None }
    }

    /// A number with a unit.
    #[must_use]
    pub fn with_unit(value: f64, unit: &str) -> Self {
        Self { value,
               unit: Some(unit.to_string()) }
    }
}

/// The on-disk shape of a unit declaration.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UnitDocument {
    One(RawUnit),
    Many(Vec<RawUnit>),
}

#[derive(Debug, Deserialize)]
struct RawUnit {
    keyword:  String,
    #[serde(default)]
    name:     Option<String>,
    category: String,
    kind:     String,
    #[serde(default)]
    ratio:    Option<f64>,
}

/// Classifies unit keywords and performs unit-aware arithmetic.
///
/// Units are grouped into categories. Inside a category, absolute units
/// with a ratio convert to the canonical unit (the one with ratio `1`);
/// relative units such as `%` resolve against their co-operand.
///
/// # Example
/// ```
/// use tokenscript::{
///     ast::BinaryOperator,
///     interpreter::units::{Quantity, UnitManager},
/// };
///
/// let units = UnitManager::default();
///
/// let sum = units.combine(BinaryOperator::Add,
///                         &[Quantity::with_unit(1.0, "rem"), Quantity::with_unit(10.0, "px")],
///                         1)
///                .unwrap();
/// assert_eq!(sum, Quantity::with_unit(26.0, "px"));
///
/// let grown = units.combine(BinaryOperator::Add,
///                           &[Quantity::with_unit(10.0, "px"), Quantity::with_unit(10.0, "%")],
///                           1)
///                  .unwrap();
/// assert_eq!(grown, Quantity::with_unit(11.0, "px"));
///
/// assert!(units.combine(BinaryOperator::Add,
///                       &[Quantity::with_unit(1.0, "s"), Quantity::with_unit(1.0, "px")],
///                       1)
///              .is_err());
/// ```
#[derive(Debug, Clone)]
pub struct UnitManager {
    units: HashMap<String, UnitSpec>,
}

impl Default for UnitManager {
    /// Registers the CSS length, time, and angle units plus `%`.
    fn default() -> Self {
        let mut manager = Self::new();
        let defaults = [UnitSpec::absolute("px", "pixel", "length", Some(1.0)),
                        UnitSpec::absolute("rem", "root em", "length", Some(16.0)),
                        UnitSpec::absolute("pt", "point", "length", Some(4.0 / 3.0)),
                        UnitSpec::absolute("pc", "pica", "length", Some(16.0)),
                        UnitSpec::absolute("in", "inch", "length", Some(96.0)),
                        UnitSpec::absolute("cm", "centimeter", "length", Some(96.0 / 2.54)),
                        UnitSpec::absolute("mm", "millimeter", "length", Some(96.0 / 25.4)),
                        UnitSpec::absolute("em", "em", "font-relative", None),
                        UnitSpec::absolute("ex", "ex", "font-relative", None),
                        UnitSpec::absolute("ch", "character", "font-relative", None),
                        UnitSpec::absolute("vw", "viewport width", "viewport", None),
                        UnitSpec::absolute("vh", "viewport height", "viewport", None),
                        UnitSpec::absolute("vmin", "viewport minimum", "viewport", None),
                        UnitSpec::absolute("vmax", "viewport maximum", "viewport", None),
                        UnitSpec::absolute("ms", "millisecond", "time", Some(1.0)),
                        UnitSpec::absolute("s", "second", "time", Some(1000.0)),
                        UnitSpec::absolute("deg", "degree", "angle", Some(1.0)),
                        UnitSpec::absolute("rad", "radian", "angle", Some(180.0 / PI)),
                        UnitSpec::absolute("turn", "turn", "angle", Some(360.0)),
                        UnitSpec::absolute("grad", "gradian", "angle", Some(0.9)),
                        UnitSpec { keyword:  "%".to_string(),
                                   name:     "percent".to_string(),
                                   category: "relative".to_string(),
                                   kind:     UnitKind::Relative { scale: 0.01 }, }];
        for spec in defaults {
            manager.units.insert(spec.keyword.clone(), spec);
        }
        manager
    }
}

impl UnitManager {
    /// Creates a manager that knows no units at all.
    #[must_use]
    pub fn new() -> Self {
        Self { units: HashMap::new() }
    }

    /// Registers a unit, replacing any unit with the same keyword.
    ///
    /// # Errors
    /// Returns `SpecError::InvalidUnit` for an empty keyword or a ratio or
    /// scale that is not a positive finite number.
    pub fn register(&mut self, spec: UnitSpec) -> Result<(), SpecError> {
        let invalid = |details: &str| SpecError::InvalidUnit { keyword: spec.keyword.clone(),
                                                               details: details.to_string(), };
        if spec.keyword.trim().is_empty() {
            return Err(invalid("the keyword is empty"));
        }
        if spec.keyword.chars().any(char::is_whitespace) {
            return Err(invalid("the keyword contains whitespace"));
        }
        let factor = match spec.kind {
            UnitKind::Absolute { ratio } => ratio,
            UnitKind::Relative { scale } => Some(scale),
        };
        if factor.is_some_and(|f| !f.is_finite() || f <= 0.0) {
            return Err(invalid("the ratio must be a positive number"));
        }

        debug!(keyword = %spec.keyword, category = %spec.category, "registered unit");
        self.units.insert(spec.keyword.to_lowercase(), spec);
        Ok(())
    }

    /// Registers one unit or an array of units from JSON.
    ///
    /// Each unit has the shape
    /// `{ "keyword", "name"?, "category", "kind": "absolute" | "relative",
    /// "ratio"? }`. For relative units `ratio` is the scale and defaults to
    /// `0.01`.
    ///
    /// # Example
    /// ```
    /// use tokenscript::interpreter::units::UnitManager;
    ///
    /// let mut units = UnitManager::default();
    /// units.register_json(r#"{ "keyword": "q", "category": "length",
    ///                          "kind": "absolute", "ratio": 0.945 }"#)
    ///      .unwrap();
    ///
    /// assert!(units.is_unit("Q"));
    /// ```
    pub fn register_json(&mut self, json: &str) -> Result<(), SpecError> {
        let raw = match serde_json::from_str::<UnitDocument>(json)? {
            UnitDocument::One(unit) => vec![unit],
            UnitDocument::Many(units) => units,
        };

        for unit in raw {
            let kind = match unit.kind.to_ascii_lowercase().as_str() {
                "absolute" => UnitKind::Absolute { ratio: unit.ratio },
                "relative" => UnitKind::Relative { scale: unit.ratio.unwrap_or(0.01) },
                other => {
                    return Err(SpecError::InvalidUnit { keyword: unit.keyword,
                                                        details: format!("unknown kind '{other}'"), });
                },
            };
            self.register(UnitSpec { name: unit.name.unwrap_or_else(|| unit.keyword.clone()),
                                     keyword: unit.keyword,
                                     category: unit.category,
                                     kind })?;
        }
        Ok(())
    }

    /// Returns the registered unit for `keyword`, case-insensitively.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&UnitSpec> {
        self.units.get(&keyword.to_lowercase())
    }

    /// Returns the normalized keyword if `word` names a unit.
    #[must_use]
    pub fn keyword(&self, word: &str) -> Option<&str> {
        self.get(word).map(|spec| spec.keyword.as_str())
    }

    /// Returns `true` if `word` names a registered unit.
    #[must_use]
    pub fn is_unit(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// Returns `true` if `word` names a relative unit.
    #[must_use]
    pub fn is_relative(&self, word: &str) -> bool {
        self.get(word).and_then(UnitSpec::scale).is_some()
    }

    /// Returns the canonical unit of `category`, the one with ratio `1`.
    #[must_use]
    pub fn canonical(&self, category: &str) -> Option<&UnitSpec> {
        self.units
            .values()
            .find(|spec| spec.category == category && spec.ratio() == Some(1.0))
    }

    /// Applies `op` across `operands`, left to right.
    ///
    /// `+` and `-` accept any number of operands (`sum` uses this); `*`,
    /// `/` and `^` take exactly two.
    ///
    /// # Errors
    /// - `UnitMismatch` when units of different categories meet, or units
    ///   without a conversion ratio.
    /// - `AmbiguousRelativeUnits` when a relative operand sits next to more
    ///   than one distinct unit.
    /// - `DivisionByZero` for a zero divisor.
    pub fn combine(&self,
                   op: BinaryOperator,
                   operands: &[Quantity],
                   line: usize)
                   -> EvalResult<Quantity> {
        match (op, operands) {
            (_, []) => Err(RuntimeError::ArgumentCountMismatch { name: op.to_string(),
                                                                 expected: "at least 1".to_string(),
                                                                 found: 0,
                                                                 line }),
            (_, [single]) => Ok(single.clone()),
            (BinaryOperator::Add | BinaryOperator::Sub, _) => {
                self.additive(op == BinaryOperator::Sub, operands, line)
            },
            (BinaryOperator::Mul | BinaryOperator::Div, [left, right]) => {
                self.multiplicative(op == BinaryOperator::Div, left, right, line)
            },
            (BinaryOperator::Pow, [base, exponent]) => {
                if let Some(unit) = &exponent.unit {
                    return Err(RuntimeError::UnitMismatch { left: base.unit
                                                                      .clone()
                                                                      .unwrap_or_default(),
                                                            right: unit.clone(),
                                                            line });
                }
                Ok(Quantity { value: base.value.powf(exponent.value),
                              unit:  base.unit.clone(), })
            },
            _ => Err(RuntimeError::ArgumentCountMismatch { name: op.to_string(),
                                                           expected: "2".to_string(),
                                                           found: operands.len(),
                                                           line }),
        }
    }

    fn additive(&self, subtract: bool, operands: &[Quantity], line: usize) -> EvalResult<Quantity> {
        let sign = |index: usize| if subtract && index > 0 { -1.0 } else { 1.0 };

        let (relative, absolute): (Vec<_>, Vec<_>) =
            operands.iter()
                    .enumerate()
                    .partition(|(_, q)| q.unit.as_deref().is_some_and(|u| self.is_relative(u)));

        let mut distinct = Vec::<&str>::new();
        for (_, quantity) in &absolute {
            if let Some(unit) = quantity.unit.as_deref()
               && !distinct.contains(&unit)
            {
                distinct.push(unit);
            }
        }

        if relative.is_empty() {
            return self.sum_absolute(&distinct, &absolute, sign, line);
        }

        if absolute.is_empty() {
            // Only relative operands: they must share one unit.
            let unit = relative[0].1.unit.clone();
            let mut total = 0.0;
            for (index, quantity) in &relative {
                if quantity.unit != unit {
                    return Err(mismatch(unit.as_deref(), quantity.unit.as_deref(), line));
                }
                total += sign(*index) * quantity.value;
            }
            return Ok(Quantity { value: total, unit });
        }

        if distinct.len() > 1 {
            return Err(RuntimeError::AmbiguousRelativeUnits { line });
        }

        let anchor = absolute.iter()
                             .map(|(index, quantity)| sign(*index) * quantity.value)
                             .sum::<f64>();
        let mut total = anchor;
        for (index, quantity) in &relative {
            let scale = quantity.unit
                                .as_deref()
                                .and_then(|u| self.get(u))
                                .and_then(UnitSpec::scale)
                                .unwrap_or(1.0);
            total += sign(*index) * anchor * quantity.value * scale;
        }

        Ok(Quantity { value: total,
                      unit:  distinct.first().map(|u| (*u).to_string()), })
    }

    fn sum_absolute(&self,
                    distinct: &[&str],
                    operands: &[(usize, &Quantity)],
                    sign: impl Fn(usize) -> f64,
                    line: usize)
                    -> EvalResult<Quantity> {
        match distinct {
            [] | [_] => {
                let value = operands.iter()
                                    .map(|(index, quantity)| sign(*index) * quantity.value)
                                    .sum();
                Ok(Quantity { value,
                              unit: distinct.first().map(|u| (*u).to_string()) })
            },
            [first, rest @ ..] => {
                let canonical = self.convertible_category(first, rest, line)?;
                let mut value = 0.0;
                for (index, quantity) in operands {
                    let ratio = quantity.unit
                                        .as_deref()
                                        .and_then(|u| self.get(u))
                                        .and_then(UnitSpec::ratio)
                                        .unwrap_or(1.0);
                    value += sign(*index) * quantity.value * ratio;
                }
                Ok(Quantity { value,
                              unit: Some(canonical) })
            },
        }
    }

    /// Checks that every unit shares `first`'s category and converts, and
    /// returns the canonical keyword of that category.
    fn convertible_category(&self, first: &str, rest: &[&str], line: usize) -> EvalResult<String> {
        let first_spec = self.get(first)
                             .filter(|spec| spec.ratio().is_some())
                             .ok_or_else(|| mismatch(Some(first), rest.first().copied(), line))?;

        for unit in rest {
            let convertible = self.get(unit)
                                  .is_some_and(|spec| {
                                      spec.category == first_spec.category && spec.ratio().is_some()
                                  });
            if !convertible {
                return Err(mismatch(Some(first), Some(*unit), line));
            }
        }

        self.canonical(&first_spec.category)
            .map(|spec| spec.keyword.clone())
            .ok_or_else(|| mismatch(Some(first), rest.first().copied(), line))
    }

    fn multiplicative(&self,
                      divide: bool,
                      left: &Quantity,
                      right: &Quantity,
                      line: usize)
                      -> EvalResult<Quantity> {
        let resolve = |quantity: &Quantity| match quantity.unit
                                                          .as_deref()
                                                          .and_then(|u| self.get(u))
                                                          .and_then(UnitSpec::scale)
        {
            Some(scale) => Quantity::plain(quantity.value * scale),
            None => quantity.clone(),
        };
        let (left, right) = (resolve(left), resolve(right));

        if divide && right.value == 0.0 {
            return Err(RuntimeError::DivisionByZero { line });
        }

        let (value, unit) = match (&left.unit, &right.unit) {
            (None, None) => (apply(divide, left.value, right.value), None),
            (Some(unit), None) => (apply(divide, left.value, right.value), Some(unit.clone())),
            (None, Some(unit)) if !divide => (left.value * right.value, Some(unit.clone())),
            (Some(a), Some(b)) if divide && a == b => (left.value / right.value, None),
            (Some(a), Some(b)) if divide => {
                self.convertible_category(a, &[b.as_str()], line)?;
                let ratio = |u: &str| self.get(u).and_then(UnitSpec::ratio).unwrap_or(1.0);
                ((left.value * ratio(a.as_str())) / (right.value * ratio(b.as_str())), None)
            },
            (a, b) => return Err(mismatch(a.as_deref(), b.as_deref(), line)),
        };

        Ok(Quantity { value, unit })
    }
}

fn apply(divide: bool, left: f64, right: f64) -> f64 {
    if divide { left / right } else { left * right }
}

fn mismatch(left: Option<&str>, right: Option<&str>, line: usize) -> RuntimeError {
    RuntimeError::UnitMismatch { left: left.unwrap_or("number").to_string(),
                                 right: right.unwrap_or("number").to_string(),
                                 line }
}
