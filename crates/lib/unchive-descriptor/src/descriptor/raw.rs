//! Wire shapes of the descriptor JSON as emitted by the component build.
//!
//! Flags are written inconsistently across sources (`"true"` in the bundled
//! catalog, `true` in some extension bundles), so they go through [flag].
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawDescriptor {
    pub name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub version: Option<String>,
    pub version_name: Option<String>,
    pub date_built: Option<String>,
    pub category_string: Option<String>,
    pub help_string: Option<String>,
    pub help_url: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub external: bool,
    #[serde(deserialize_with = "flag")]
    pub non_visible: bool,
    #[serde(deserialize_with = "loose_string")]
    pub android_min_sdk: Option<String>,
    pub author: Option<String>,
    #[serde(deserialize_with = "list")]
    pub properties: Vec<RawProperty>,
    #[serde(deserialize_with = "list")]
    pub block_properties: Vec<RawBlockProperty>,
    #[serde(deserialize_with = "list")]
    pub events: Vec<RawEvent>,
    #[serde(deserialize_with = "list")]
    pub methods: Vec<RawMethod>,
}

/// A designer property, the kind that shows up in a `.scm` property bag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawProperty {
    pub name: String,
    pub editor_type: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub default_value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawBlockProperty {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub rw: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub deprecated: bool,
    pub helper: Option<RawHelper>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawEvent {
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub deprecated: bool,
    #[serde(deserialize_with = "list")]
    pub params: Vec<RawParam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawMethod {
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub deprecated: bool,
    #[serde(deserialize_with = "list")]
    pub params: Vec<RawParam>,
    pub return_type: Option<String>,
    pub helper: Option<RawHelper>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawParam {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub helper: Option<RawHelper>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawHelper {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
    pub keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawOptionList {
    pub class_name: Option<String>,
    pub key: Option<String>,
    pub tag: Option<String>,
    pub default_opt: Option<String>,
    pub underlying_type: Option<String>,
    pub options: Vec<RawOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawOption {
    pub name: String,
    #[serde(deserialize_with = "loose_string")]
    pub value: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub deprecated: bool,
}

/// Accepts `true`, `"true"` (any case) and treats everything else as false.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Accepts strings, numbers and booleans as text.
pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

/// Treats an explicit `null` list the same as a missing one.
fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
