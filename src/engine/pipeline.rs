//! Quote-to-Schedule pipeline
//!
//! A [`SchedulePipeline`] borrows the read-only catalog and rules and can be
//! shared between threads. Item numbers, motor numbers and occurrence counts
//! live in a [`Run`] created for each quote, so concurrent quotes never see
//! each other's counters.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::Catalog;
use crate::engine::aggregate::{ScheduleBuilder, ScheduleHeader};
use crate::engine::electrical;
use crate::engine::expand::{expand, ExpandError, ExpandedRow};
use crate::engine::extract::QuoteExtractor;
use crate::engine::filter::{LineFilter, Occurrence};
use crate::engine::motor::{MotorCounter, MotorDetector};
use crate::engine::resolve::resolve;
use crate::engine::rules::ScheduleRules;
use crate::entities::{Quantity, QuoteDocument, Schedule, ScheduleLineItem, VoltageTable};

/// Errors that stop a schedule from being produced
#[derive(Debug, Error, Diagnostic)]
pub enum ScheduleError {
    #[error("Quote text is empty")]
    #[diagnostic(
        code(qsched::schedule::empty_quote),
        help("Convert the quote document to plain text first")
    )]
    EmptyQuote,

    #[error("Invalid quote pattern: {0}")]
    #[diagnostic(code(qsched::schedule::pattern))]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Expand(#[from] ExpandError),
}

/// Derives schedules from quotes against one catalog and rule set
#[derive(Debug, Clone)]
pub struct SchedulePipeline<'a> {
    catalog: &'a Catalog,
    rules: &'a ScheduleRules,
    extractor: QuoteExtractor,
    motors: MotorDetector,
}

impl<'a> SchedulePipeline<'a> {
    pub fn new(catalog: &'a Catalog, rules: &'a ScheduleRules) -> Result<Self, ScheduleError> {
        Ok(Self {
            catalog,
            rules,
            extractor: QuoteExtractor::new()?,
            motors: MotorDetector::new(&rules.motor_keywords),
        })
    }

    /// Extract quote metadata and line items without resolving anything
    pub fn extract(&self, quote_text: &str) -> QuoteDocument {
        self.extractor
            .extract(quote_text, self.rules.voltages.default_country())
    }

    /// Full derivation from quote text.
    ///
    /// `country` overrides the country detected from the ship-to address.
    pub fn derive(&self, quote_text: &str, country: Option<&str>) -> Result<Schedule, ScheduleError> {
        if quote_text.trim().is_empty() {
            return Err(ScheduleError::EmptyQuote);
        }

        let doc = self.extract(quote_text);
        if doc.items.is_empty() {
            warn!("No line items recognized in quote");
        }
        let country = country.unwrap_or(&doc.detected_country);
        self.generate(&doc, country)
    }

    /// Derive a schedule from already extracted quote data
    pub fn generate(&self, doc: &QuoteDocument, country: &str) -> Result<Schedule, ScheduleError> {
        let (country, table) = self.rules.voltages.lookup(country);
        debug!(country, %table, "Using voltage table");

        let mut run = Run::new(self, table);
        for item in &doc.items {
            if run.filter.excludes(item) {
                run.builder.excluded(item);
                continue;
            }

            let Some(resolution) = resolve(self.catalog, &item.part_number) else {
                warn!(part = %item.part_number, "Part number not found in catalog");
                run.builder.not_found(item);
                continue;
            };

            let occurrence = run.filter.record(resolution.key);
            if let Occurrence::Repeat(n) = occurrence {
                run.builder.repeated(resolution.key, n);
            }

            run.next_main += 1;
            for row in expand(resolution.entry, run.next_main, &self.motors)? {
                run.emit(&row, item.quantity, occurrence.number());
            }
        }

        Ok(run.builder.finish(ScheduleHeader {
            project_name: doc.project_label().to_string(),
            acknowledgment_number: doc.acknowledgment_label().to_string(),
            country: country.to_string(),
            voltage_table: table,
        }))
    }
}

/// State for one quote
struct Run<'p> {
    motors: &'p MotorDetector,
    table: VoltageTable,
    filter: LineFilter<'p>,
    motor_counter: MotorCounter,
    builder: ScheduleBuilder,
    next_main: u32,
}

impl<'p> Run<'p> {
    fn new(pipeline: &'p SchedulePipeline<'_>, table: VoltageTable) -> Self {
        Self {
            motors: &pipeline.motors,
            table,
            filter: LineFilter::new(&pipeline.rules.exclusions),
            motor_counter: MotorCounter::new(),
            builder: ScheduleBuilder::new(),
            next_main: 0,
        }
    }

    fn emit(&mut self, row: &ExpandedRow<'_>, quoted: u32, occurrence: u32) {
        let record = row.record;
        let motor = self
            .motors
            .is_motor_record(record)
            .then(|| self.motor_counter.next_label());

        let quantity = match (row.is_sub_component, &motor) {
            (false, _) if quoted > 0 => Quantity::Count(quoted),
            (false, _) => Quantity::placeholder(),
            (true, Some((number, _))) => Quantity::Count(*number),
            (true, None) => Quantity::blank(),
        };

        self.builder.push(ScheduleLineItem {
            item_number: row.item_number.clone(),
            part_number: record.part_number.clone(),
            quantity,
            description: record.description.clone(),
            electrical: electrical::derive(record, &self.table),
            port: record.port.clone(),
            cold_water_flag: record.cold_water.clone(),
            hot_water_flag: record.hot_water.clone(),
            reclaim_flag: record.reclaim.clone(),
            flow_rate_gpm: record.flow_rate_gpm.clone(),
            heat_output_btuh: record.heat_output_btuh.clone(),
            is_sub_component: row.is_sub_component,
            motor_label: motor.map(|(_, label)| label),
            occurrence,
        });
    }
}

/// One-shot derivation for callers that handle a single quote
pub fn derive_schedule(
    quote_text: &str,
    country: Option<&str>,
    catalog: &Catalog,
    rules: &ScheduleRules,
) -> Result<Schedule, ScheduleError> {
    SchedulePipeline::new(catalog, rules)?.derive(quote_text, country)
}
