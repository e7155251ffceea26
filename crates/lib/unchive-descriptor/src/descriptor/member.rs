use crate::descriptor::property::Helper;
use crate::descriptor::raw::{RawEvent, RawMethod, RawParam};

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub type_name: Option<String>,
    pub helper: Option<Helper>,
}

impl ParamSpec {
    pub(crate) fn from_raw(raw: &RawParam) -> Self {
        Self {
            name: raw.name.clone(),
            type_name: raw.type_name.clone(),
            helper: raw.helper.as_ref().map(Helper::from_raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
    pub name: String,
    pub description: Option<String>,
    pub deprecated: bool,
    pub params: Vec<ParamSpec>,
}

impl EventSpec {
    pub(crate) fn from_raw(raw: &RawEvent) -> Self {
        Self {
            name: raw.name.clone(),
            description: raw.description.clone(),
            deprecated: raw.deprecated,
            params: raw.params.iter().map(ParamSpec::from_raw).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    pub name: String,
    pub description: Option<String>,
    pub deprecated: bool,
    pub params: Vec<ParamSpec>,
    pub return_type: Option<String>,
    /// Helper describing the returned value, if any.
    pub helper: Option<Helper>,
}

impl MethodSpec {
    pub(crate) fn from_raw(raw: &RawMethod) -> Self {
        Self {
            name: raw.name.clone(),
            description: raw.description.clone(),
            deprecated: raw.deprecated,
            params: raw.params.iter().map(ParamSpec::from_raw).collect(),
            return_type: raw.return_type.clone(),
            helper: raw.helper.as_ref().map(Helper::from_raw),
        }
    }

    pub fn returns_value(&self) -> bool {
        self.return_type.is_some()
    }
}
