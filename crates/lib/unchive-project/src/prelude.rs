pub use crate::config::{BUILTIN_NAMESPACE, ResolverConfig};
pub use crate::database::ComponentDatabase;
pub use crate::error::*;
pub use crate::extension::{BuildInfo, Extension, ExtensionInfo};
pub use crate::origin::{Classification, Origin, OriginClassifier};
pub use crate::project::{Asset, Project, ProjectBuilder, ProjectContext, Screen};
pub use crate::property::value::{Color, PropertyValue};
pub use crate::property::{PropertyResolver, ResolvedProperty};
pub use crate::scheme::SchemeDocument;
pub use crate::summary::{ProjectSummary, TypeCount};
pub use crate::tree::{Component, ComponentId, ComponentTreeBuilder};

pub type BuildResult<T> = Result<T, BuildError>;
pub type AssemblyResult<T> = Result<T, AssemblyError>;
pub type SchemeResult<T> = Result<T, SchemeError>;
pub type ExtensionResult<T> = Result<T, ExtensionError>;
