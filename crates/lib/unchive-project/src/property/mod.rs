//! Resolution of a component's raw property bag against its descriptor.
use crate::prelude::*;
use crate::property::value::PropertyValue;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use unchive_descriptor::descriptor::TypeDescriptor;
use unchive_descriptor::descriptor::property::PropertySpec;

pub mod value;

/// Designer id; describes the node rather than a property.
const UUID_KEY: &str = "Uuid";

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperty {
    pub name: String,
    pub value: PropertyValue,
    /// Spec the value was resolved against; `None` for pass-through properties.
    pub spec: Option<Arc<PropertySpec>>,
}

impl ResolvedProperty {
    fn pass_through(name: &str, raw: String) -> Self {
        Self {
            name: name.to_owned(),
            value: PropertyValue::Unresolved(raw),
            spec: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.spec.is_some()
    }
}

/// Stateless resolver; every call is independent of every other.
pub struct PropertyResolver;

impl PropertyResolver {
    /// Resolves every property of `bag`, in source order.
    ///
    /// Properties never fail individually: a missing spec or a value that
    /// does not fit its spec yields an unresolved pass-through. Specs without
    /// a raw value are not synthesized. Only a bag that is not a JSON object
    /// is an error, which the caller turns into a faulty node.
    pub fn resolve(
        bag: &Value,
        descriptor: Option<&TypeDescriptor>,
    ) -> Result<Vec<ResolvedProperty>, ResolveError> {
        let bag = bag.as_object().ok_or(ResolveError::NotAnObject)?;

        let properties = bag
            .iter()
            .filter(|(name, _)| !is_structural_key(name))
            .map(|(name, raw)| Self::resolve_one(name, raw, descriptor))
            .collect();

        Ok(properties)
    }

    fn resolve_one(
        name: &str,
        raw: &Value,
        descriptor: Option<&TypeDescriptor>,
    ) -> ResolvedProperty {
        let Some(text) = PropertyValue::raw_text(raw) else {
            return ResolvedProperty::pass_through(name, raw.to_string());
        };

        let Some(spec) = descriptor.and_then(|descriptor| descriptor.property(name)) else {
            return ResolvedProperty::pass_through(name, text);
        };

        match PropertyValue::parse(spec, &text) {
            Some(value) => ResolvedProperty {
                name: name.to_owned(),
                value,
                spec: Some(Arc::clone(spec)),
            },
            None => {
                debug!(
                    property = name,
                    raw = %text,
                    expected = ?spec.value_type,
                    "Property value does not match its spec"
                );
                ResolvedProperty::pass_through(name, text)
            }
        }
    }
}

/// `$Name`, `$Type`, `$Components`, `$Version`, ... and `Uuid`.
pub(crate) fn is_structural_key(key: &str) -> bool {
    key.starts_with('$') || key == UUID_KEY
}
