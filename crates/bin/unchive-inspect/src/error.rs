use thiserror::Error;
use unchive_project::prelude::{AssemblyError, ExtensionError};

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("The path provided does not exist: {0}")]
    InexistentPath(String),

    #[error("The path provided is not a directory: {0}")]
    NotDirectory(String),

    #[error("No screen files were found under: {0}")]
    NoScreens(String),

    #[error("An IO error occurred: {0}")]
    GeneralIo(#[from] std::io::Error),

    #[error("Walking the project directory failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Extension `{package}` could not be decoded: {error}")]
    Extension {
        package: String,
        error: ExtensionError,
    },

    #[error("The project could not be assembled: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("The summary could not be serialized: {0}")]
    Json(#[from] serde_json::Error),
}
