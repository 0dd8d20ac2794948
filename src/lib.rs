//! qsched: Quote-to-Schedule derivation
//!
//! Turns the plain text of a commercial equipment quote into a structured,
//! hierarchically-numbered electrical equipment schedule.

pub mod cli;
pub mod core;
pub mod entities;
pub mod engine;
