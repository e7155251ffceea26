//! The built-in descriptor catalog.
//!
//! The catalog is parsed from a single JSON array (the bundled
//! `simple_components.json`) and is read-only afterwards. [CatalogCell]
//! guarantees that parse happens at most once for the lifetime of the cell,
//! and it is handed explicitly to whoever needs built-in descriptors.
use crate::descriptor::TypeDescriptor;
use crate::prelude::*;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Where the catalog's JSON text comes from.
pub trait DescriptorSource: Send + Sync {
    fn load(&self) -> CatalogResult<Cow<'_, str>>;
}

impl DescriptorSource for str {
    fn load(&self) -> CatalogResult<Cow<'_, str>> {
        Ok(Cow::Borrowed(self))
    }
}

impl DescriptorSource for String {
    fn load(&self) -> CatalogResult<Cow<'_, str>> {
        Ok(Cow::Borrowed(self.as_str()))
    }
}

impl<S: DescriptorSource + ?Sized> DescriptorSource for &S {
    fn load(&self) -> CatalogResult<Cow<'_, str>> {
        (**self).load()
    }
}

/// Built-in type descriptors keyed by fully qualified type.
#[derive(Debug, Clone, Default)]
pub struct DescriptorCatalog {
    descriptors: HashMap<String, Arc<TypeDescriptor>>,
    /// Type ids in source order
    order: Vec<String>,
}

impl DescriptorCatalog {
    pub fn from_json(source: &str) -> CatalogResult<Self> {
        let value: Value = serde_json::from_str(source)?;
        let entries = value.as_array().ok_or(CatalogError::NotAnArray)?;

        let descriptors = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                TypeDescriptor::from_value(entry)
                    .map_err(|error| CatalogError::InvalidDescriptor { index, error })
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        Self::from_descriptors(descriptors)
    }

    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = TypeDescriptor>,
    ) -> CatalogResult<Self> {
        let mut catalog = Self::default();

        for descriptor in descriptors {
            if catalog.descriptors.contains_key(&descriptor.type_id) {
                return Err(CatalogError::DuplicateType(descriptor.type_id));
            }

            catalog.order.push(descriptor.type_id.clone());
            catalog
                .descriptors
                .insert(descriptor.type_id.clone(), Arc::new(descriptor));
        }

        Ok(catalog)
    }

    pub fn lookup(&self, type_id: &str) -> Option<&Arc<TypeDescriptor>> {
        self.descriptors.get(type_id)
    }

    /// Looks up `<namespace>.<short_name>`.
    pub fn lookup_builtin(
        &self,
        namespace: &str,
        short_name: &str,
    ) -> Option<&Arc<TypeDescriptor>> {
        self.lookup(&format!("{namespace}.{short_name}"))
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.descriptors.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates descriptors in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.order
            .iter()
            .filter_map(|type_id| self.descriptors.get(type_id))
    }
}

/// Builds a [DescriptorCatalog] from its source exactly once.
///
/// Every call to [CatalogCell::build] after the first returns the same
/// `Arc` (or the same error) without touching the source again.
pub struct CatalogCell<S> {
    source: S,
    catalog: OnceLock<CatalogResult<Arc<DescriptorCatalog>>>,
}

impl<S: DescriptorSource> CatalogCell<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            catalog: OnceLock::new(),
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn build(&self) -> CatalogResult<Arc<DescriptorCatalog>> {
        self.catalog
            .get_or_init(|| {
                info!("Building the built-in descriptor catalog");
                let result = self
                    .source
                    .load()
                    .and_then(|source| DescriptorCatalog::from_json(&source))
                    .map(Arc::new);

                match &result {
                    Ok(catalog) => info!(descriptors = catalog.len(), "Descriptor catalog built"),
                    Err(error) => warn!(%error, "Descriptor catalog could not be built"),
                }

                result
            })
            .clone()
    }

    pub fn is_built(&self) -> bool {
        self.catalog.get().is_some()
    }
}

impl<S> std::fmt::Debug for CatalogCell<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCell")
            .field("built", &self.catalog.get().is_some())
            .finish()
    }
}
