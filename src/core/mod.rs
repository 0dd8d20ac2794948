//! Core module - configuration, logging, catalog loading and built-in reference data

pub mod catalog_loader;
pub mod config;
pub mod data;
pub mod logging;

pub use catalog_loader::{Catalog, CatalogError};
pub use config::{Config, ConfigError};
pub use data::DataError;
pub use logging::Verbosity;
