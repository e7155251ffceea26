use thiserror::Error;

/// Errors raised while turning a single JSON object into a [crate::descriptor::TypeDescriptor].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("Descriptor is not a JSON object")]
    NotAnObject,

    #[error("Descriptor is missing its `type` field")]
    MissingType,

    #[error("Descriptor `{type_id}` has a malformed shape: {details}")]
    Malformed { type_id: String, details: String },
}

/// Errors raised while building the built-in descriptor catalog.
///
/// Cloneable so that a failed one-time build can be reported to every caller
/// that asks for the catalog afterwards.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Descriptor source could not be loaded: {0}")]
    Source(String),

    #[error("Descriptor source is not valid JSON: {0}")]
    Json(String),

    #[error("Descriptor source must be a JSON array of descriptors")]
    NotAnArray,

    #[error("Descriptor at index {index} is invalid: {error}")]
    InvalidDescriptor {
        index: usize,
        error: DescriptorError,
    },

    #[error("Descriptor type `{0}` is declared more than once")]
    DuplicateType(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        CatalogError::Json(error.to_string())
    }
}
