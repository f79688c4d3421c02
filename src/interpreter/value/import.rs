use std::collections::{BTreeMap, HashMap};

use serde_json::Value as Json;

use crate::interpreter::value::{color::is_hex_color, core::Value, number::NumberSymbol};

impl Value {
    /// Imports a host-supplied JSON value.
    ///
    /// Numbers become `Number` (keeping a decimal point if the JSON had
    /// one), hex-shaped strings become hex colors, other strings become
    /// `String`, arrays become explicit lists, objects become dictionaries,
    /// and `null` becomes `Null`.
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use tokenscript::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::from_json(&json!("#ff0000")), Value::hex("#ff0000"));
    /// assert_eq!(Value::from_json(&json!(1.5)).to_string(), "1.5");
    /// assert_eq!(Value::from_json(&json!([1, "a"])).to_string(), "1, a");
    /// ```
    #[must_use]
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::from(*b),
            Json::Number(n) => {
                let value = n.as_f64().unwrap_or(f64::NAN);
                if n.is_f64() {
                    Self::Number(NumberSymbol::float(value))
                } else {
                    Self::number(value)
                }
            },
            Json::String(s) if is_hex_color(s) => Self::hex(s),
            Json::String(s) => Self::string(s.as_str()),
            Json::Array(items) => Self::list(items.iter().map(Self::from_json).collect(), false),
            Json::Object(entries) => {
                let entries = entries.iter()
                                     .map(|(key, value)| (key.clone(), Self::from_json(value)))
                                     .collect::<BTreeMap<_, _>>();
                Self::dictionary(entries)
            },
        }
    }
}

/// Imports a whole reference map, see [`Value::from_json`].
///
/// # Example
/// ```
/// use std::collections::HashMap;
///
/// use serde_json::json;
/// use tokenscript::{interpret, interpreter::value::import::import_references};
///
/// let references = import_references(&HashMap::from([("space".to_string(), json!(4))]));
/// let value = interpret("{space} * 2px", references, None).unwrap();
/// assert_eq!(value.to_string(), "8px");
/// ```
#[must_use]
pub fn import_references<S: std::hash::BuildHasher>(references: &HashMap<String, Json, S>)
                                                    -> HashMap<String, Value> {
    references.iter()
              .map(|(name, json)| (name.clone(), Value::from_json(json)))
              .collect()
}
