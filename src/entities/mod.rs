//! Entity type definitions
//!
//! The derivation pipeline moves data through three families of types:
//!
//! - [`QuoteLineItem`] / [`QuoteDocument`] - what the extractor recognizes in quote text
//! - [`CatalogRecord`] / [`CatalogEntry`] - read-only equipment reference data
//! - [`ScheduleLineItem`] / [`Schedule`] - the derived, numbered schedule

pub mod catalog;
pub mod quote;
pub mod schedule;

pub use catalog::{CatalogEntry, CatalogRecord, CellValue, Phase};
pub use quote::{QuoteDocument, QuoteFormat, QuoteLineItem};
pub use schedule::{ElectricalAttrs, Quantity, Schedule, ScheduleLineItem, VoltageTable};
