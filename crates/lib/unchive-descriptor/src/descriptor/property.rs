use crate::descriptor::raw::{RawBlockProperty, RawHelper, RawOptionList, RawProperty};

/// Value type a property is declared with.
///
/// Derived from the helper first, then the designer editor type, then the
/// block type, so a property backed by an option list is always a [ValueType::Choice].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Boolean,
    Integer,
    Float,
    Color,
    Asset,
    Screen,
    Component,
    Choice,
    Other(String),
}

impl ValueType {
    fn from_editor_type(editor_type: &str) -> Option<Self> {
        let value_type = match editor_type {
            "boolean" | "visibility" => ValueType::Boolean,
            "color" => ValueType::Color,
            "integer" | "non_negative_integer" => ValueType::Integer,
            "float" | "non_negative_float" | "latitude" | "longitude" => ValueType::Float,
            "asset" => ValueType::Asset,
            "string" | "text" | "textArea" | "textAreaMultiLine" => ValueType::Text,
            editor if editor.starts_with("component") => ValueType::Component,
            _ => return None,
        };

        Some(value_type)
    }

    fn from_block_type(block_type: &str) -> Self {
        match block_type {
            "boolean" => ValueType::Boolean,
            "number" => ValueType::Float,
            "text" => ValueType::Text,
            "component" => ValueType::Component,
            other => ValueType::Other(other.to_owned()),
        }
    }

    fn from_helper(helper: &Helper) -> Option<Self> {
        match helper {
            Helper::OptionList(_) => Some(ValueType::Choice),
            Helper::Asset => Some(ValueType::Asset),
            Helper::Screen => Some(ValueType::Screen),
            _ => None,
        }
    }
}

/// Read/write mode of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
    Invisible,
    /// Only settable in the designer, no block exposes it.
    Designer,
}

impl Access {
    fn from_rw(rw: Option<&str>) -> Self {
        match rw {
            Some("read-only") => Access::ReadOnly,
            Some("write-only") => Access::WriteOnly,
            Some("read-write") => Access::ReadWrite,
            Some("invisible") => Access::Invisible,
            _ => Access::Designer,
        }
    }

    pub fn is_settable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }

    pub fn is_gettable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }
}

/// UI hint attached to a property, method or parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Helper {
    OptionList(OptionList),
    Asset,
    Screen,
    Provider,
    ProviderModel,
    Other(String),
}

impl Helper {
    pub(crate) fn from_raw(raw: &RawHelper) -> Self {
        match raw.kind.as_str() {
            "OPTION_LIST" => match OptionList::from_raw(raw) {
                Some(option_list) => Helper::OptionList(option_list),
                None => Helper::Other(raw.kind.clone()),
            },
            "ASSET" => Helper::Asset,
            "SCREEN" => Helper::Screen,
            "PROVIDER" => Helper::Provider,
            "PROVIDER_MODEL" => Helper::ProviderModel,
            other => Helper::Other(other.to_owned()),
        }
    }

    /// Key under which the helper's option list is shared between descriptors.
    pub fn key(&self) -> Option<&str> {
        match self {
            Helper::OptionList(option_list) => option_list.key(),
            _ => None,
        }
    }

    pub fn option_list(&self) -> Option<&OptionList> {
        match self {
            Helper::OptionList(option_list) => Some(option_list),
            _ => None,
        }
    }
}

/// A bounded set of named values, e.g. horizontal alignments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionList {
    pub key: Option<String>,
    pub tag: Option<String>,
    pub class_name: Option<String>,
    pub default_option: Option<String>,
    pub underlying_type: Option<String>,
    pub options: Vec<OptionSpec>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionSpec {
    pub name: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
}

impl OptionList {
    fn from_raw(raw: &RawHelper) -> Option<Self> {
        if let Ok(data) = serde_json::from_value::<RawOptionList>(raw.data.clone()) {
            if !data.options.is_empty() || data.key.is_some() || data.tag.is_some() {
                return Some(Self {
                    key: data.key,
                    tag: data.tag,
                    class_name: data.class_name,
                    default_option: data.default_opt,
                    underlying_type: data.underlying_type,
                    options: data
                        .options
                        .into_iter()
                        .map(|option| OptionSpec {
                            name: option.name,
                            value: option.value,
                            description: option.description,
                            deprecated: option.deprecated,
                        })
                        .collect(),
                });
            }
        }

        // Older bundles ship bare name lists instead of an option list object.
        let names = serde_json::from_value::<Vec<String>>(raw.data.clone())
            .ok()
            .or_else(|| {
                raw.data
                    .get("keys")
                    .and_then(|keys| serde_json::from_value::<Vec<String>>(keys.clone()).ok())
            })
            .or_else(|| raw.keys.clone())?;

        Some(Self {
            options: names
                .into_iter()
                .map(|name| OptionSpec {
                    name,
                    ..OptionSpec::default()
                })
                .collect(),
            ..Self::default()
        })
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().or(self.tag.as_deref())
    }

    /// Finds the option whose underlying value (or, lacking one, name) equals `value`.
    pub fn option_for_value(&self, value: &str) -> Option<&OptionSpec> {
        self.options
            .iter()
            .find(|option| option.value.as_deref().unwrap_or(&option.name) == value)
    }
}

/// Schema entry for one property of a component type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    pub name: String,
    pub value_type: ValueType,
    pub editor_type: Option<String>,
    pub default_value: Option<String>,
    pub access: Access,
    pub helper: Option<Helper>,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Whether the property is part of the designer property bag.
    pub designer: bool,
}

impl PropertySpec {
    /// Builds a designer property spec, completing it with the block
    /// property of the same name when the descriptor declares one.
    pub(crate) fn from_designer(raw: &RawProperty, block: Option<&RawBlockProperty>) -> Self {
        let helper = block
            .and_then(|block| block.helper.as_ref())
            .map(Helper::from_raw);
        let value_type = Self::derive_value_type(
            helper.as_ref(),
            raw.editor_type.as_deref(),
            block.and_then(|block| block.type_name.as_deref()),
        );

        Self {
            name: raw.name.clone(),
            value_type,
            editor_type: raw.editor_type.clone(),
            default_value: raw.default_value.clone(),
            access: Access::from_rw(block.and_then(|block| block.rw.as_deref())),
            helper,
            description: raw
                .description
                .clone()
                .or_else(|| block.and_then(|block| block.description.clone())),
            deprecated: block.is_some_and(|block| block.deprecated),
            designer: true,
        }
    }

    pub(crate) fn from_block(raw: &RawBlockProperty) -> Self {
        let helper = raw.helper.as_ref().map(Helper::from_raw);
        let value_type =
            Self::derive_value_type(helper.as_ref(), None, raw.type_name.as_deref());

        Self {
            name: raw.name.clone(),
            value_type,
            editor_type: None,
            default_value: None,
            access: Access::from_rw(raw.rw.as_deref()),
            helper,
            description: raw.description.clone(),
            deprecated: raw.deprecated,
            designer: false,
        }
    }

    fn derive_value_type(
        helper: Option<&Helper>,
        editor_type: Option<&str>,
        block_type: Option<&str>,
    ) -> ValueType {
        helper
            .and_then(ValueType::from_helper)
            .or_else(|| editor_type.and_then(ValueType::from_editor_type))
            .or_else(|| block_type.map(ValueType::from_block_type))
            .unwrap_or_else(|| {
                ValueType::Other(editor_type.unwrap_or("any").to_owned())
            })
    }
}
