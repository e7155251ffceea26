pub use crate::catalog::{CatalogCell, DescriptorCatalog, DescriptorSource};
pub use crate::descriptor::TypeDescriptor;
pub use crate::descriptor::member::{EventSpec, MethodSpec, ParamSpec};
pub use crate::descriptor::property::{
    Access, Helper, OptionList, OptionSpec, PropertySpec, ValueType,
};
pub use crate::error::*;

pub type CatalogResult<T> = Result<T, CatalogError>;
pub type DescriptorResult<T> = Result<T, DescriptorError>;
