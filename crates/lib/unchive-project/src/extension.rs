//! Extensions: user supplied component types shipped in `.aix` bundles.
use crate::prelude::*;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};
use tracing::debug;
use unchive_descriptor::descriptor::{TypeDescriptor, short_name};

const DEFAULT_MIN_SDK: &str = "21";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Build metadata recorded in `component_build_infos.json`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(rename = "type")]
    pub type_id: Option<String>,
    pub author: Option<String>,
    #[serde(deserialize_with = "first_scalar")]
    pub android_min_sdk: Option<String>,
    pub compiled_by: Option<String>,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

/// `androidMinSdk` is written either as a scalar or as a one element array.
fn first_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(values)) => values.first().and_then(scalar),
        Some(value) => scalar(&value),
        None => None,
    })
}

/// A decoded extension component.
///
/// Immutable once created and owned by the [Project] it was loaded into.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    /// Qualifying name, e.g. `com.acme.Widget`. Its trailing segment is
    /// what component `$Type`s are matched against.
    pub name: String,
    pub descriptor: Arc<TypeDescriptor>,
    pub build_info: BuildInfo,
    pub file_size: u64,
    pub package_name: String,
}

impl Extension {
    pub fn new(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor: Arc::new(descriptor),
            build_info: BuildInfo::default(),
            file_size: 0,
            package_name: String::new(),
        }
    }

    pub fn with_build_info(mut self, build_info: BuildInfo) -> Self {
        self.build_info = build_info;
        self
    }

    pub fn with_file_size(mut self, file_size: u64) -> Self {
        self.file_size = file_size;
        self
    }

    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    /// Decodes every component of an extension bundle.
    ///
    /// `components_json` is the bundle's `components.json`; the optional
    /// `build_infos_json` is matched to components by type id. Each
    /// resulting extension is named after its descriptor type.
    #[tracing::instrument(skip_all)]
    pub fn from_bundle(
        components_json: &str,
        build_infos_json: Option<&str>,
        file_size: u64,
    ) -> ExtensionResult<Vec<Self>> {
        let components: Value = serde_json::from_str(components_json)
            .map_err(|error| ExtensionError::Json(error.to_string()))?;
        let components = components.as_array().ok_or(ExtensionError::NotAnArray)?;

        let build_infos: Vec<BuildInfo> = match build_infos_json {
            Some(json) => {
                serde_json::from_str(json).map_err(|error| ExtensionError::Json(error.to_string()))?
            }
            None => vec![],
        };

        components
            .iter()
            .enumerate()
            .map(|(index, component)| {
                let descriptor = TypeDescriptor::from_value(component)
                    .map_err(|error| ExtensionError::InvalidDescriptor { index, error })?;

                let build_info = build_infos
                    .iter()
                    .find(|info| info.type_id.as_deref() == Some(descriptor.type_id.as_str()))
                    .cloned()
                    .unwrap_or_default();

                let package_name = descriptor
                    .type_id
                    .rsplit_once('.')
                    .map(|(package, _)| package.to_owned())
                    .unwrap_or_default();

                debug!(extension = %descriptor.type_id, "Decoded extension component");

                Ok(Self::new(descriptor.type_id.clone(), descriptor)
                    .with_build_info(build_info)
                    .with_file_size(file_size)
                    .with_package_name(package_name))
            })
            .collect()
    }

    /// Trailing dot-segment of the qualifying name.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    /// Case-sensitive exact comparison of `short_type` with [Extension::short_name].
    pub fn matches(&self, short_type: &str) -> bool {
        self.short_name() == short_type
    }

    pub fn info(&self) -> ExtensionInfo {
        let descriptor = &self.descriptor;

        let author = self
            .build_info
            .author
            .clone()
            .or_else(|| descriptor.author.clone())
            .filter(|author| !author.eq_ignore_ascii_case("unknown"));

        let min_sdk = self
            .build_info
            .android_min_sdk
            .clone()
            .or_else(|| descriptor.android_min_sdk.clone())
            .unwrap_or_else(|| DEFAULT_MIN_SDK.to_owned());
        let min_sdk = strip_api_prefix(&min_sdk).to_owned();

        let package = [
            self.package_name.as_str(),
            self.name.as_str(),
            descriptor.type_id.as_str(),
        ]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or("Unknown")
        .to_owned();

        let version = descriptor.version.clone().unwrap_or_else(|| "1".to_owned());

        ExtensionInfo {
            name: Some(descriptor.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown Extension".to_owned()),
            package,
            version_name: descriptor.version_name.clone().unwrap_or_else(|| version.clone()),
            version,
            description: clean_description(
                descriptor
                    .help_string
                    .as_deref()
                    .or(descriptor.help_url.as_deref())
                    .unwrap_or_default(),
            ),
            date_built: descriptor.date_built.clone(),
            file_size: self.file_size,
            author,
            compiled_by: self.build_info.compiled_by.as_deref().map(Compiler::parse),
            min_sdk,
        }
    }
}

/// Display-ready facts about an extension.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionInfo {
    pub name: String,
    pub package: String,
    pub version: String,
    pub version_name: String,
    pub description: String,
    pub date_built: Option<String>,
    pub file_size: u64,
    /// `None` when the bundle does not name one.
    pub author: Option<String>,
    pub compiled_by: Option<Compiler>,
    pub min_sdk: String,
}

/// Tool that compiled an extension, e.g. `FAST v2.8.4`.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiler {
    pub name: String,
    pub version: Option<String>,
}

impl Compiler {
    fn parse(compiled_by: &str) -> Self {
        let parts: Vec<&str> = compiled_by.split(" v").collect();
        match parts.as_slice() {
            [name, version] => Self {
                name: title_case(name),
                version: Some(format!("v{version}")),
            },
            _ => Self {
                name: compiled_by.to_owned(),
                version: None,
            },
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn strip_api_prefix(min_sdk: &str) -> &str {
    match min_sdk.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("api ") => min_sdk[4..].trim_start(),
        _ => min_sdk,
    }
}

/// Drops HTML tags and non-breaking space entities from a help string.
fn clean_description(text: &str) -> String {
    let cleaned = TAG_RE.replace_all(text, "").replace("&nbsp;", " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "No description available".to_owned()
    } else {
        cleaned.to_owned()
    }
}
