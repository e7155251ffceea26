//! Decides whether a component type is built in or provided by an extension.
use crate::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use unchive_descriptor::catalog::DescriptorCatalog;
use unchive_descriptor::descriptor::TypeDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    BuiltIn,
    Extension,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::BuiltIn => f.write_str("BUILT_IN"),
            Origin::Extension => f.write_str("EXTENSION"),
        }
    }
}

/// Outcome of classifying one short type name.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub origin: Origin,
    /// `None` when neither an extension nor the catalog knows the type.
    pub descriptor: Option<Arc<TypeDescriptor>>,
}

/// Classifies short type names against a project's extensions and the
/// built-in catalog.
///
/// The catalog is optional: when it failed to build, every built-in type
/// simply classifies without a descriptor.
#[derive(Debug, Clone, Copy)]
pub struct OriginClassifier<'a> {
    catalog: Option<&'a DescriptorCatalog>,
    extensions: &'a [Extension],
    namespace: &'a str,
}

impl<'a> OriginClassifier<'a> {
    pub fn new(
        catalog: Option<&'a DescriptorCatalog>,
        extensions: &'a [Extension],
        namespace: &'a str,
    ) -> Self {
        Self {
            catalog,
            extensions,
            namespace,
        }
    }

    /// First extension in list order whose qualifying name ends in
    /// `.<short_type>` wins; otherwise the catalog is consulted.
    pub fn classify(&self, short_type: &str) -> Classification {
        if let Some(extension) = self
            .extensions
            .iter()
            .find(|extension| extension.matches(short_type))
        {
            debug!(short_type, extension = %extension.name, "Classified as extension");
            return Classification {
                origin: Origin::Extension,
                descriptor: Some(Arc::clone(&extension.descriptor)),
            };
        }

        let descriptor = self
            .catalog
            .and_then(|catalog| catalog.lookup_builtin(self.namespace, short_type))
            .cloned();

        if descriptor.is_none() {
            debug!(short_type, "No descriptor found for built-in type");
        }

        Classification {
            origin: Origin::BuiltIn,
            descriptor,
        }
    }
}
