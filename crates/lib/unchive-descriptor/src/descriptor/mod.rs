//! Typed model of a component type descriptor.
//!
//! Descriptors come from two places: the bundled built-in catalog and the
//! `components.json` embedded in every extension bundle. Both share one wire
//! shape, parsed here into an immutable [TypeDescriptor].
use crate::descriptor::member::{EventSpec, MethodSpec};
use crate::descriptor::property::PropertySpec;
use crate::descriptor::raw::RawDescriptor;
use crate::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub mod member;
pub mod property;
pub(crate) mod raw;

/// Schema of one component type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Fully qualified type, e.g. `com.google.appinventor.components.runtime.Button`
    pub type_id: String,
    /// Short name, e.g. `Button`
    pub name: String,
    pub version: Option<String>,
    pub version_name: Option<String>,
    pub date_built: Option<String>,
    pub category: Option<String>,
    pub help_string: Option<String>,
    pub help_url: Option<String>,
    pub external: bool,
    pub non_visible: bool,
    pub android_min_sdk: Option<String>,
    pub author: Option<String>,
    /// Designer properties, in declaration order.
    pub properties: Vec<Arc<PropertySpec>>,
    /// Block properties, in declaration order.
    pub block_properties: Vec<Arc<PropertySpec>>,
    pub events: Vec<EventSpec>,
    pub methods: Vec<MethodSpec>,
    property_index: HashMap<String, usize>,
}

impl TypeDescriptor {
    pub fn from_json(source: &str) -> DescriptorResult<Self> {
        let value: Value =
            serde_json::from_str(source).map_err(|error| DescriptorError::Malformed {
                type_id: String::new(),
                details: error.to_string(),
            })?;

        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> DescriptorResult<Self> {
        if !value.is_object() {
            return Err(DescriptorError::NotAnObject);
        }

        let type_id = value
            .get("type")
            .and_then(Value::as_str)
            .filter(|type_id| !type_id.is_empty())
            .ok_or(DescriptorError::MissingType)?
            .to_owned();

        let raw: RawDescriptor = serde_json::from_value(value.clone()).map_err(|error| {
            DescriptorError::Malformed {
                type_id: type_id.clone(),
                details: error.to_string(),
            }
        })?;

        Ok(Self::from_raw(type_id, raw))
    }

    fn from_raw(type_id: String, raw: RawDescriptor) -> Self {
        let properties: Vec<Arc<PropertySpec>> = raw
            .properties
            .iter()
            .map(|property| {
                let block = raw
                    .block_properties
                    .iter()
                    .find(|block| block.name == property.name);
                Arc::new(PropertySpec::from_designer(property, block))
            })
            .collect();

        // The first declaration of a name wins the lookup.
        let mut property_index = HashMap::with_capacity(properties.len());
        for (index, property) in properties.iter().enumerate() {
            property_index.entry(property.name.clone()).or_insert(index);
        }

        let name = raw
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| short_name(&type_id).to_owned());

        Self {
            name,
            version: raw.version,
            version_name: raw.version_name,
            date_built: raw.date_built,
            category: raw.category_string,
            help_string: raw.help_string,
            help_url: raw.help_url,
            external: raw.external,
            non_visible: raw.non_visible,
            android_min_sdk: raw.android_min_sdk,
            author: raw.author,
            properties,
            block_properties: raw
                .block_properties
                .iter()
                .map(|block| Arc::new(PropertySpec::from_block(block)))
                .collect(),
            events: raw.events.iter().map(EventSpec::from_raw).collect(),
            methods: raw.methods.iter().map(MethodSpec::from_raw).collect(),
            property_index,
            type_id,
        }
    }

    /// Looks up a designer property by exact name.
    pub fn property(&self, name: &str) -> Option<&Arc<PropertySpec>> {
        self.property_index
            .get(name)
            .and_then(|&index| self.properties.get(index))
    }

    pub fn block_property(&self, name: &str) -> Option<&Arc<PropertySpec>> {
        self.block_properties
            .iter()
            .find(|property| property.name == name)
    }

    pub fn event(&self, name: &str) -> Option<&EventSpec> {
        self.events.iter().find(|event| event.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// Trailing dot-separated segment of a qualified name.
pub fn short_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit('.')
        .next()
        .unwrap_or(qualified_name)
}
