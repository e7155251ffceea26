//! Short-name index over every descriptor a project can see.
use crate::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use unchive_descriptor::catalog::DescriptorCatalog;
use unchive_descriptor::descriptor::member::{EventSpec, MethodSpec};
use unchive_descriptor::descriptor::property::{OptionList, PropertySpec};
use unchive_descriptor::descriptor::{TypeDescriptor, short_name};

#[derive(Debug, Clone, Default)]
pub struct ComponentDatabase {
    types: HashMap<String, Arc<TypeDescriptor>>,
    option_lists: HashMap<String, OptionList>,
}

impl ComponentDatabase {
    /// Indexes the catalog's descriptors, then the extensions'. An extension
    /// shadows a built-in type with the same short name.
    pub fn new(catalog: Option<&DescriptorCatalog>, extensions: &[Extension]) -> Self {
        let mut database = Self::default();

        let builtins = catalog.into_iter().flat_map(DescriptorCatalog::iter);
        let extensions = extensions.iter().map(|extension| &extension.descriptor);

        for descriptor in builtins.chain(extensions) {
            database.index(descriptor);
        }

        debug!(
            types = database.types.len(),
            option_lists = database.option_lists.len(),
            "Component database indexed"
        );

        database
    }

    fn index(&mut self, descriptor: &Arc<TypeDescriptor>) {
        let helpers = descriptor
            .properties
            .iter()
            .chain(&descriptor.block_properties)
            .filter_map(|property| property.helper.as_ref())
            .chain(descriptor.methods.iter().flat_map(|method| {
                method
                    .helper
                    .iter()
                    .chain(method.params.iter().filter_map(|param| param.helper.as_ref()))
            }))
            .chain(descriptor.events.iter().flat_map(|event| {
                event
                    .params
                    .iter()
                    .filter_map(|param| param.helper.as_ref())
            }));

        for helper in helpers {
            if let (Some(key), Some(option_list)) = (helper.key(), helper.option_list()) {
                self.option_lists
                    .entry(key.to_owned())
                    .or_insert_with(|| option_list.clone());
            }
        }

        self.types.insert(
            short_name(&descriptor.type_id).to_owned(),
            Arc::clone(descriptor),
        );
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn get_type(&self, type_name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(type_name)
    }

    pub fn event_for_type(&self, type_name: &str, event: &str) -> Option<&EventSpec> {
        self.get_type(type_name)?.event(event)
    }

    pub fn method_for_type(&self, type_name: &str, method: &str) -> Option<&MethodSpec> {
        self.get_type(type_name)?.method(method)
    }

    pub fn block_property_for_type(
        &self,
        type_name: &str,
        property: &str,
    ) -> Option<&Arc<PropertySpec>> {
        self.get_type(type_name)?.block_property(property)
    }

    /// Block properties that have a setter block, in declaration order.
    pub fn setter_names(&self, type_name: &str) -> Vec<&str> {
        self.block_property_names(type_name, |property| property.access.is_settable())
    }

    /// Block properties that have a getter block, in declaration order.
    pub fn getter_names(&self, type_name: &str) -> Vec<&str> {
        self.block_property_names(type_name, |property| property.access.is_gettable())
    }

    fn block_property_names(
        &self,
        type_name: &str,
        filter: impl Fn(&PropertySpec) -> bool,
    ) -> Vec<&str> {
        self.get_type(type_name)
            .map(|descriptor| {
                descriptor
                    .block_properties
                    .iter()
                    .filter(|property| filter(property))
                    .map(|property| property.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Option list registered under a helper key (or tag). The first
    /// descriptor declaring a key wins.
    pub fn option_list(&self, key: &str) -> Option<&OptionList> {
        self.option_lists.get(key)
    }

    /// Type name implied by a designer instance name, e.g. `Button` for `Button1`.
    pub fn instance_type_name(instance_name: &str) -> &str {
        instance_name.trim_end_matches(|ch: char| ch.is_ascii_digit())
    }

    /// Types known to the database, sorted by short name.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
