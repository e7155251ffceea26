pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod prelude;
