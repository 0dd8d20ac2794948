//! Line-item extraction from plain quote text
//!
//! Two input shapes are recognized:
//!
//! - **Sales orders**: priced quotes where each item ends with
//!   `<qty> <unit price> <total>T`, the trailing `T` being the tax marker.
//!   An item block may wrap over several lines.
//! - **Schedules**: pre-populated equipment schedules, one tabular row per
//!   item (`<seq> <project item #> <part> <qty> <description...>`) up to a
//!   `TOTAL` line.
//!
//! Text that matches neither shape yields no items. That is not an error;
//! the caller decides how to report an empty quote.

use regex::Regex;
use tracing::{debug, info};

use crate::engine::voltage::detect_country;
use crate::entities::{QuoteDocument, QuoteFormat, QuoteLineItem};

/// Pattern set for quote text, compiled once and reused across quotes
#[derive(Debug, Clone)]
pub struct QuoteExtractor {
    schedule_header: Regex,
    schedule_marker: Regex,
    sales_section: Regex,
    sales_item: Regex,
    schedule_total: Regex,
    schedule_row: Regex,
    acknowledgment: Regex,
    quote_number: Regex,
    project_number: Regex,
    ship_to: Regex,
    schedule_title: Regex,
    project_label: Regex,
    street_address: Regex,
    wide_gap: Regex,
}

impl QuoteExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // Column header and title that only the schedule form carries
            schedule_header: Regex::new(r"(?i)PROJECT\s+ITEM\s*#")?,
            schedule_marker: Regex::new(r"(?i)EQUIPMENT\s+REQUIREMENTS")?,
            sales_section: Regex::new(
                r"(?is)Item\s+Description\s+Qty\s+Unit\s*Price\s+Total\s+(.*?)(?:Subtotal|Page\s+\d|$)",
            )?,
            sales_item: Regex::new(
                r"(?s)(?:^|\s)([A-Z0-9][A-Z0-9._-]*)\s+(.+?)\s+(\d+)\s+[\d,]+\.\d+\s+[\d,]+\.\d+T\b",
            )?,
            schedule_total: Regex::new(r"\bTOTAL\b")?,
            schedule_row: Regex::new(
                r"^\s*\d+\s+(\d+[A-Z]*)\s+([A-Z0-9][A-Z0-9._-]*)\s+(\d+|#)\s+(.+)$",
            )?,
            acknowledgment: Regex::new(
                r"(?i)Acknowledgment\s*(?:Number|No\.?|#)\s*:?\s*([A-Z0-9][A-Z0-9-]*)",
            )?,
            quote_number: Regex::new(
                r"(?i)\b(?:Quote|Order)\s*(?:Number|No\.?|#)\s*:?\s*([A-Z0-9][A-Z0-9-]*)",
            )?,
            project_number: Regex::new(r"(?i)\bPROJECT\s*#\s*:?\s*([A-Z0-9][A-Z0-9-]*)")?,
            ship_to: Regex::new(
                r"(?is)\bShip\s*To\b\s*:?[ \t]*(.*?)(?:Customer\s+PO|Item\s+Description|Bill\s+To|\n[ \t]*\n|$)",
            )?,
            schedule_title: Regex::new(r#""([^"\n]+)"\s*-\s*(?:ELECTRICAL\s+)?SCHEDULE"#)?,
            project_label: Regex::new(r"(?im)^\s*PROJECT(?:\s+NAME)?\s*:\s*(\S.*?)\s*$")?,
            street_address: Regex::new(
                r"(?im)^\s*(\d+\s+[^\n]*?\b(?:USA|UNITED STATES|CANADA|AUSTRALIA|UNITED KINGDOM|UK|MEXICO)\b)",
            )?,
            wide_gap: Regex::new(r"[ \t]{2,}")?,
        })
    }

    /// Which strategy applies to this text
    pub fn detect_format(&self, text: &str) -> QuoteFormat {
        if self.schedule_header.is_match(text) && self.schedule_marker.is_match(text) {
            QuoteFormat::Schedule
        } else {
            QuoteFormat::SalesOrder
        }
    }

    /// Extract items and metadata.
    ///
    /// `default_country` is reported when the ship-to address names none.
    pub fn extract(&self, text: &str, default_country: &str) -> QuoteDocument {
        let format = self.detect_format(text);
        let items = match format {
            QuoteFormat::SalesOrder => self.sales_items(text),
            QuoteFormat::Schedule => self.schedule_items(text),
        };
        info!(%format, items = items.len(), "Extracted quote line items");

        let (project_name, ship_to) = match format {
            QuoteFormat::SalesOrder => self.ship_to_block(text),
            QuoteFormat::Schedule => self.schedule_heading(text),
        };
        let detected_country = detect_country(ship_to.as_deref().unwrap_or(""), default_country);

        QuoteDocument {
            format,
            acknowledgment_number: self.acknowledgment_number(text, format),
            project_name,
            ship_to,
            detected_country,
            items,
        }
    }

    /// Items from a priced sales order, across every item section
    pub fn sales_items(&self, text: &str) -> Vec<QuoteLineItem> {
        let sections: Vec<&str> = self
            .sales_section
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();

        let sections = if sections.is_empty() {
            debug!("No item header found, scanning the whole text");
            vec![text]
        } else {
            sections
        };

        sections
            .into_iter()
            .flat_map(|section| self.sales_items_in(section))
            .collect()
    }

    fn sales_items_in(&self, section: &str) -> Vec<QuoteLineItem> {
        self.sales_item
            .captures_iter(section)
            .map(|caps| {
                let part = caps[1].to_string();
                let description = normalize_whitespace(&caps[2]);
                let quantity = caps[3].parse().unwrap_or(0);
                QuoteLineItem::new(part, description, quantity)
            })
            .collect()
    }

    /// Main-item rows of a schedule table; lettered sub-item rows are skipped
    pub fn schedule_items(&self, text: &str) -> Vec<QuoteLineItem> {
        let Some(header) = self.schedule_header.find(text) else {
            return Vec::new();
        };
        let table = &text[header.start()..];
        let table = match self.schedule_total.find(table) {
            Some(m) => &table[..m.start()],
            None => table,
        };

        table
            .lines()
            .skip(1)
            .filter_map(|line| self.schedule_captures(line))
            .collect()
    }

    fn schedule_captures(&self, line: &str) -> Option<QuoteLineItem> {
        let caps = self.schedule_row.captures(line)?;
        let project_item = &caps[1];
        if !project_item.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let quantity = caps[3].parse().unwrap_or(0);
        let description = leading_description(&caps[4]);
        Some(QuoteLineItem::new(&caps[2], description, quantity))
    }

    /// Acknowledgment number, falling back to the quote/order or project number
    pub fn acknowledgment_number(&self, text: &str, format: QuoteFormat) -> Option<String> {
        let patterns = match format {
            QuoteFormat::SalesOrder => [&self.acknowledgment, &self.quote_number],
            QuoteFormat::Schedule => [&self.project_number, &self.acknowledgment],
        };
        patterns
            .iter()
            .find_map(|re| re.captures(text))
            .map(|caps| caps[1].to_string())
    }

    /// Project name and address from the "Ship To" block
    fn ship_to_block(&self, text: &str) -> (Option<String>, Option<String>) {
        let Some(block) = self.ship_to.captures(text).and_then(|c| c.get(1)) else {
            return (None, None);
        };
        let block = block.as_str();

        let project = block
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .and_then(|line| self.wide_gap.split(line).next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let address = Some(normalize_whitespace(block)).filter(|s| !s.is_empty());
        (project, address)
    }

    /// Project name and address from a schedule's heading
    fn schedule_heading(&self, text: &str) -> (Option<String>, Option<String>) {
        let (ship_project, ship_address) = self.ship_to_block(text);

        let project = self
            .schedule_title
            .captures(text)
            .or_else(|| self.project_label.captures(text))
            .map(|c| normalize_whitespace(&c[1]))
            .or(ship_project);

        let address = ship_address.or_else(|| {
            self.street_address
                .captures(text)
                .map(|c| normalize_whitespace(&c[1]))
        });

        (project, address)
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Description words of a schedule row, up to the first numeric or `-` cell
fn leading_description(rest: &str) -> String {
    rest.split_whitespace()
        .take_while(|word| *word != "-" && !is_numeric_cell(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_numeric_cell(word: &str) -> bool {
    let digits = word.replace(',', "");
    !digits.is_empty() && digits.parse::<f64>().is_ok()
}
