//! Derivation engine - turns quote text into an equipment schedule
//!
//! Stages run strictly forward: [`extract`] → [`filter`] → [`resolve`] →
//! [`expand`] → ([`electrical`], [`motor`]) → [`aggregate`]. The
//! [`pipeline`] module wires them together for one quote at a time.

pub mod aggregate;
pub mod electrical;
pub mod expand;
pub mod extract;
pub mod filter;
pub mod motor;
pub mod pipeline;
pub mod resolve;
pub mod rules;
pub mod voltage;

pub use extract::QuoteExtractor;
pub use pipeline::{derive_schedule, ScheduleError, SchedulePipeline};
pub use resolve::{resolve, MatchTier, Resolution};
pub use rules::{RulesError, ScheduleRules};
pub use voltage::{detect_country, VoltageTables};
