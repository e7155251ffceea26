use serde_json::Value;
use std::fmt;
use unchive_descriptor::descriptor::property::{PropertySpec, ValueType};

/// A property value after it was checked against its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Color(Color),
    Asset(String),
    Screen(String),
    Component(String),
    /// A value from a bounded option list; `option` is the option's name
    /// when the list knows the value.
    Choice {
        value: String,
        option: Option<String>,
    },
    /// The raw text, kept as-is because no spec matched or it did not parse.
    Unresolved(String),
}

impl PropertyValue {
    /// Parses `raw` as declared by `spec`, or `None` if it does not fit.
    pub(crate) fn parse(spec: &PropertySpec, raw: &str) -> Option<Self> {
        let value = match &spec.value_type {
            ValueType::Text | ValueType::Other(_) => PropertyValue::Text(raw.to_owned()),
            ValueType::Boolean => PropertyValue::Boolean(parse_bool(raw)?),
            ValueType::Integer => PropertyValue::Integer(raw.trim().parse().ok()?),
            ValueType::Float => {
                let number: f64 = raw.trim().parse().ok()?;
                if !number.is_finite() {
                    return None;
                }
                PropertyValue::Float(number)
            }
            ValueType::Color => PropertyValue::Color(Color::parse(raw)?),
            ValueType::Asset => PropertyValue::Asset(raw.to_owned()),
            ValueType::Screen => PropertyValue::Screen(raw.to_owned()),
            ValueType::Component => PropertyValue::Component(raw.to_owned()),
            ValueType::Choice => PropertyValue::Choice {
                value: raw.to_owned(),
                option: spec
                    .helper
                    .as_ref()
                    .and_then(|helper| helper.option_list())
                    .and_then(|option_list| option_list.option_for_value(raw))
                    .map(|option| option.name.clone()),
            },
        };

        Some(value)
    }

    /// Textual form of a raw JSON scalar; `None` for null, arrays and objects.
    pub(crate) fn raw_text(value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, PropertyValue::Unresolved(_))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text)
            | PropertyValue::Asset(text)
            | PropertyValue::Screen(text)
            | PropertyValue::Component(text)
            | PropertyValue::Unresolved(text) => f.write_str(text),
            PropertyValue::Boolean(flag) => write!(f, "{flag}"),
            PropertyValue::Integer(number) => write!(f, "{number}"),
            PropertyValue::Float(number) => write!(f, "{number}"),
            PropertyValue::Color(color) => write!(f, "{color}"),
            PropertyValue::Choice {
                option: Some(option),
                ..
            } => f.write_str(option),
            PropertyValue::Choice { value, .. } => f.write_str(value),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// An ARGB color, written `&HAARRGGBB` in project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw
            .strip_prefix("&H")
            .or_else(|| raw.strip_prefix("&h"))?;

        if digits.is_empty()
            || digits.len() > 8
            || !digits.bytes().all(|byte| byte.is_ascii_hexdigit())
        {
            return None;
        }

        u32::from_str_radix(digits, 16).ok().map(Color)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// CSS style `#RRGGBBAA`.
    pub fn to_css(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red(),
            self.green(),
            self.blue(),
            self.alpha()
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&H{:08X}", self.0)
    }
}
