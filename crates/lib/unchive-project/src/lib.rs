//! Reconstruction of typed component trees from decoded project bundles.
//!
//! The pipeline is: `.scm` text ([scheme]) → raw JSON form → [tree] builder,
//! which classifies every node ([origin]) and resolves its property bag
//! ([property]) against a built-in or extension descriptor → [project]
//! assembly. [database] and [summary] are read-only views over the result.
pub mod config;
pub mod database;
pub mod error;
pub mod extension;
pub mod origin;
pub mod prelude;
pub mod project;
pub mod property;
pub mod scheme;
pub mod summary;
pub mod tree;
