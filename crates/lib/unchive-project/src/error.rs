use std::fmt;
use thiserror::Error;

/// Errors that abort building a component tree.
///
/// Everything below the root degrades to a faulty node instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("Root component is not a JSON object")]
    RootNotAnObject,

    #[error("Root component is missing its `$Name`")]
    MissingRootName,
}

/// Errors raised while resolving a component's property bag as a whole.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Property bag is not a JSON object")]
    NotAnObject,
}

/// Which list of [crate::project::Project::assemble] an invalid item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Screen,
    Extension,
    Asset,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Screen => f.write_str("screen"),
            ItemKind::Extension => f.write_str("extension"),
            ItemKind::Asset => f.write_str("asset"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("Screen name cannot be empty")]
    EmptyScreenName,

    #[error("Invalid {kind} at index {index}: {reason}")]
    InvalidItem {
        kind: ItemKind,
        index: usize,
        reason: String,
    },

    #[error("Screen `{screen}` could not be built: {error}")]
    Build { screen: String, error: BuildError },

    #[error("Screen `{screen}` could not be decoded: {error}")]
    Scheme { screen: String, error: SchemeError },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemeError {
    #[error("Scheme text is missing its `#|` / `|#` framing")]
    MissingFraming,

    #[error("Scheme text is missing its `$JSON` marker")]
    MissingJsonMarker,

    #[error("Scheme payload is not valid JSON: {0}")]
    Json(String),

    #[error("Scheme payload has no `Properties` object")]
    MissingProperties,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtensionError {
    #[error("Extension bundle is not valid JSON: {0}")]
    Json(String),

    #[error("Extension bundle must list its components in a JSON array")]
    NotAnArray,

    #[error("Extension component at index {index} is invalid: {error}")]
    InvalidDescriptor {
        index: usize,
        error: unchive_descriptor::error::DescriptorError,
    },
}
