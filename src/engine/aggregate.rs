//! Folding schedule rows and diagnostics into the final Schedule

use tracing::info;

use crate::engine::electrical::round2;
use crate::entities::{QuoteLineItem, Schedule, ScheduleLineItem, VoltageTable};

/// Labels and voltage configuration carried onto the Schedule
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleHeader {
    pub project_name: String,
    pub acknowledgment_number: String,
    pub country: String,
    pub voltage_table: VoltageTable,
}

/// Accumulates rows in emission order
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    items: Vec<ScheduleLineItem>,
    not_found: Vec<String>,
    excluded: Vec<String>,
    repeated: Vec<String>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ScheduleLineItem) {
        self.items.push(row);
    }

    pub fn not_found(&mut self, item: &QuoteLineItem) {
        self.not_found.push(item.label());
    }

    pub fn excluded(&mut self, item: &QuoteLineItem) {
        self.excluded.push(item.label());
    }

    /// `part` is the resolved catalog key
    pub fn repeated(&mut self, part: &str, occurrence: u32) {
        self.repeated
            .push(format!("{} (occurrence {})", part, occurrence));
    }

    pub fn finish(self, header: ScheduleHeader) -> Schedule {
        let total_motors = self
            .items
            .iter()
            .filter(|i| i.motor_label.is_some())
            .count() as u32;
        let total_amps = round2(self.items.iter().map(ScheduleLineItem::amps_value).sum());

        info!(
            rows = self.items.len(),
            total_motors,
            total_amps,
            not_found = self.not_found.len(),
            excluded = self.excluded.len(),
            "Schedule complete"
        );

        Schedule {
            project_name: header.project_name,
            acknowledgment_number: header.acknowledgment_number,
            country: header.country,
            voltage_table: header.voltage_table,
            items: self.items,
            total_motors,
            total_amps,
            not_found_items: self.not_found,
            excluded_items: self.excluded,
            repeated_items: self.repeated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CellValue, ElectricalAttrs, Quantity};

    fn row(item_number: &str, amps: Option<CellValue>, motor: Option<&str>) -> ScheduleLineItem {
        ScheduleLineItem {
            item_number: item_number.to_string(),
            part_number: "P".to_string(),
            quantity: Quantity::Count(1),
            description: "d".to_string(),
            electrical: ElectricalAttrs {
                amps,
                ..Default::default()
            },
            port: None,
            cold_water_flag: None,
            hot_water_flag: None,
            reclaim_flag: None,
            flow_rate_gpm: None,
            heat_output_btuh: None,
            is_sub_component: false,
            motor_label: motor.map(str::to_string),
            occurrence: 1,
        }
    }

    fn header() -> ScheduleHeader {
        ScheduleHeader {
            project_name: "Test".to_string(),
            acknowledgment_number: "1".to_string(),
            country: "USA".to_string(),
            voltage_table: VoltageTable::new(460, 120),
        }
    }

    #[test]
    fn test_totals() {
        let mut builder = ScheduleBuilder::new();
        builder.push(row("1", Some(CellValue::Number(1.111)), Some("M-1")));
        builder.push(row("2", Some(CellValue::from("2.222")), None));
        builder.push(row("3", Some(CellValue::from("see notes")), Some("M-2")));
        builder.push(row("4", None, None));

        let schedule = builder.finish(header());
        assert_eq!(schedule.total_motors, 2);
        assert_eq!(schedule.total_amps, 3.33);
        assert_eq!(schedule.items.len(), 4);
    }

    #[test]
    fn test_diagnostic_lists() {
        let mut builder = ScheduleBuilder::new();
        let item = QuoteLineItem::new("MCC-460", "Motor Control Center", 1);
        builder.excluded(&item);
        builder.not_found(&QuoteLineItem::new("ZZZ", "Mystery", 1));
        builder.repeated("RC4", 2);

        let schedule = builder.finish(header());
        assert_eq!(schedule.excluded_items, vec!["MCC-460 - Motor Control Center"]);
        assert_eq!(schedule.not_found_items, vec!["ZZZ - Mystery"]);
        assert_eq!(schedule.repeated_items, vec!["RC4 (occurrence 2)"]);
        assert_eq!(schedule.total_amps, 0.0);
    }
}
