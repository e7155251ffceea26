//! Decoding of `.scm` screen files.
//!
//! A screen file wraps a JSON document in a block comment:
//!
//! ```text
//! #|
//! $JSON
//! {"YaVersion":"208","Source":"Form","Properties":{...}}
//! |#
//! ```
use crate::prelude::*;
use serde_json::Value;

/// The decoded JSON of a screen file.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeDocument {
    /// The root form, ready for the tree builder.
    pub properties: Value,
    pub ya_version: Option<String>,
    pub source: Option<String>,
    pub auth_url: Vec<String>,
}

pub fn decode(scheme: &str) -> SchemeResult<SchemeDocument> {
    let body = scheme
        .trim()
        .strip_prefix("#|")
        .and_then(|body| body.strip_suffix("|#"))
        .ok_or(SchemeError::MissingFraming)?;

    let json = body
        .trim()
        .strip_prefix("$JSON")
        .ok_or(SchemeError::MissingJsonMarker)?;

    let mut document: Value =
        serde_json::from_str(json.trim()).map_err(|error| SchemeError::Json(error.to_string()))?;

    let properties = document
        .get_mut("Properties")
        .filter(|properties| properties.is_object())
        .map(Value::take)
        .ok_or(SchemeError::MissingProperties)?;

    let text = |key: &str| document.get(key).and_then(Value::as_str).map(str::to_owned);

    Ok(SchemeDocument {
        ya_version: text("YaVersion"),
        source: text("Source"),
        auth_url: document
            .get("authURL")
            .and_then(Value::as_array)
            .map(|urls| {
                urls.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default(),
        properties,
    })
}
