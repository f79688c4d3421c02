use std::{collections::BTreeMap, fmt};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::Value,
            method::{CallContext, MethodDef, SymbolType, method_table},
        },
    },
};

/// The name of the built-in hex color format.
pub const HEX_FORMAT: &str = "Hex";

/// Returns `true` for `#` followed by exactly 3 or 6 hex digits.
///
/// # Example
/// ```
/// use tokenscript::interpreter::value::color::is_hex_color;
///
/// assert!(is_hex_color("#fff"));
/// assert!(is_hex_color("#A0b1C2"));
/// assert!(!is_hex_color("#ffff"));
/// assert!(!is_hex_color("fff"));
/// ```
#[must_use]
pub fn is_hex_color(text: &str) -> bool {
    text.strip_prefix('#')
        .is_some_and(|digits| {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        })
}

/// What a color holds, depending on its format.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorPayload {
    /// The literal hex text of a `Hex` color.
    Hex(Option<String>),
    /// The channels of a color in a registered format.
    Channels(Option<BTreeMap<String, Value>>),
}

/// A color in the built-in hex format or in a registered format.
///
/// The subtype names the format and never changes; conversions produce a
/// new color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSymbol {
    /// The format name, e.g. `Hex` or `Rgb`.
    pub subtype: String,
    /// The color data.
    pub payload: ColorPayload,
}

impl ColorSymbol {
    /// A hex color.
    #[must_use]
    pub fn hex(value: &str) -> Self {
        Self { subtype: HEX_FORMAT.to_string(),
               payload: ColorPayload::Hex(Some(value.to_string())), }
    }

    /// A color in a registered format.
    #[must_use]
    pub fn with_channels(subtype: &str, channels: BTreeMap<String, Value>) -> Self {
        Self { subtype: subtype.to_string(),
               payload: ColorPayload::Channels(Some(channels)), }
    }

    /// The empty color of the given format.
    #[must_use]
    pub fn empty(subtype: &str) -> Self {
        let payload = if subtype.eq_ignore_ascii_case(HEX_FORMAT) {
            ColorPayload::Hex(None)
        } else {
            ColorPayload::Channels(None)
        };
        Self { subtype: subtype.to_string(),
               payload }
    }

    /// Returns `true` for a `Hex` color.
    #[must_use]
    pub fn is_hex(&self) -> bool {
        matches!(self.payload, ColorPayload::Hex(_))
    }

    /// Returns the hex text of a `Hex` color.
    #[must_use]
    pub fn hex_value(&self) -> Option<&str> {
        match &self.payload {
            ColorPayload::Hex(value) => value.as_deref(),
            ColorPayload::Channels(_) => None,
        }
    }

    /// Returns the channels of a color in a registered format.
    #[must_use]
    pub const fn channels(&self) -> Option<&BTreeMap<String, Value>> {
        match &self.payload {
            ColorPayload::Channels(channels) => channels.as_ref(),
            ColorPayload::Hex(_) => None,
        }
    }

    /// Borrows one channel mutably.
    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Value> {
        match &mut self.payload {
            ColorPayload::Channels(Some(channels)) => channels.get_mut(name),
            _ => None,
        }
    }
}

impl fmt::Display for ColorSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            ColorPayload::Hex(Some(value)) => write!(f, "{value}"),
            ColorPayload::Channels(Some(channels)) => {
                let values = channels.values()
                                     .map(ToString::to_string)
                                     .collect::<Vec<_>>()
                                     .join(", ");
                write!(f, "{}({values})", self.subtype.to_lowercase())
            },
            ColorPayload::Hex(None) | ColorPayload::Channels(None) => Ok(()),
        }
    }
}

method_table! {
    ColorSymbol;
    "to_string"() -> "String" => to_string,
}

impl SymbolType for ColorSymbol {
    const TYPE_NAME: &'static str = "Color";

    fn methods() -> &'static [MethodDef<Self>] {
        METHODS
    }

    fn is_empty(&self) -> bool {
        matches!(self.payload,
                 ColorPayload::Hex(None) | ColorPayload::Channels(None))
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.channels()
            .is_some_and(|channels| channels.contains_key(name))
    }

    fn get_attribute(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.channels()
            .and_then(|channels| channels.get(name))
            .cloned()
            .ok_or_else(|| unknown_channel(self, name, line))
    }

    /// Writes a channel; new channels may be added to a registered-format
    /// color.
    fn set_attribute(&mut self, name: &str, value: Value, line: usize) -> EvalResult<()> {
        match &mut self.payload {
            ColorPayload::Channels(Some(channels)) => {
                channels.insert(name.to_string(), value);
                Ok(())
            },
            ColorPayload::Channels(slot @ None) => {
                *slot = Some(BTreeMap::from([(name.to_string(), value)]));
                Ok(())
            },
            ColorPayload::Hex(_) => {
                Err(RuntimeError::UnknownAttribute { type_name: format!("Color.{HEX_FORMAT}"),
                                                     name: name.to_string(),
                                                     line })
            },
        }
    }
}

fn unknown_channel(color: &ColorSymbol, name: &str, line: usize) -> RuntimeError {
    RuntimeError::UnknownAttribute { type_name: format!("Color.{}", color.subtype),
                                     name: name.to_string(),
                                     line }
}

/// Renders the color through its format's stringify script.
fn to_string(color: &mut ColorSymbol, _: Vec<Value>, ctx: &CallContext) -> EvalResult<Value> {
    let config = ctx.config;
    Ok(Value::string(config.colors.stringify(color, config, ctx.line)?))
}
