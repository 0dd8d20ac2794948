//! CLI command implementations

pub mod batch;
pub mod completions;
pub mod config;
pub mod countries;
pub mod extract;
pub mod generate;
pub mod resolve;
