//! Schedule entity types - the terminal artifact handed to renderers

use serde::{Deserialize, Serialize};

use crate::entities::catalog::{CellValue, Phase};

/// Supply voltages for one destination country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoltageTable {
    /// Three-phase supply voltage
    #[serde(rename = "threePhase", alias = "three_phase")]
    pub three_phase: u32,

    /// Single-phase supply voltage
    #[serde(rename = "onePhase", alias = "one_phase")]
    pub one_phase: u32,
}

impl VoltageTable {
    pub fn new(three_phase: u32, one_phase: u32) -> Self {
        Self {
            three_phase,
            one_phase,
        }
    }

    /// Supply voltage for the given phase
    pub fn for_phase(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Three => self.three_phase,
            Phase::Single => self.one_phase,
        }
    }
}

impl std::fmt::Display for VoltageTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}V (3Ø) / {}V (1Ø)", self.three_phase, self.one_phase)
    }
}

/// Content of the schedule's quantity column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// A number: quoted quantity on main rows, motor number on motor sub-rows
    Count(u32),
    /// Placeholder text: `#` on main rows without a quantity, empty on sub-rows
    Text(String),
}

impl Quantity {
    /// Placeholder for a main row whose quote line carried no quantity
    pub fn placeholder() -> Self {
        Quantity::Text("#".to_string())
    }

    pub fn blank() -> Self {
        Quantity::Text(String::new())
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Count(n) => write!(f, "{}", n),
            Quantity::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Electrical operating parameters of a schedule row after derivation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricalAttrs {
    pub hp: Option<CellValue>,
    pub phase: Option<Phase>,
    pub volts: Option<CellValue>,
    pub amps: Option<CellValue>,
    pub breaker_rating: Option<CellValue>,
}

/// One row of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleLineItem {
    /// Hierarchical item number (`5`, `5A`, `5AA`)
    pub item_number: String,

    pub part_number: String,

    pub quantity: Quantity,

    pub description: String,

    #[serde(flatten)]
    pub electrical: ElectricalAttrs,

    pub port: Option<CellValue>,

    pub cold_water_flag: Option<CellValue>,

    pub hot_water_flag: Option<CellValue>,

    pub reclaim_flag: Option<CellValue>,

    #[serde(rename = "flowRateGPM")]
    pub flow_rate_gpm: Option<CellValue>,

    #[serde(rename = "heatOutputBTUH")]
    pub heat_output_btuh: Option<CellValue>,

    pub is_sub_component: bool,

    /// `M-<n>` when the row is motorized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motor_label: Option<String>,

    /// Which purchase of this part number the row belongs to (1 for the first)
    pub occurrence: u32,
}

impl ScheduleLineItem {
    /// Numeric amps for aggregation; unparsable or absent amps count as 0
    pub fn amps_value(&self) -> f64 {
        self.electrical
            .amps
            .as_ref()
            .and_then(CellValue::as_number)
            .unwrap_or(0.0)
    }

    /// Numeric prefix of the item number
    pub fn main_number(&self) -> Option<u32> {
        let digits: String = self
            .item_number
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

/// The derived equipment schedule for one quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub project_name: String,

    pub acknowledgment_number: String,

    /// Country whose voltage table was applied
    pub country: String,

    pub voltage_table: VoltageTable,

    pub items: Vec<ScheduleLineItem>,

    pub total_motors: u32,

    /// Sum of numeric amps, rounded to 2 decimals
    pub total_amps: f64,

    /// `"<part> - <description>"` for quote lines with no catalog match
    pub not_found_items: Vec<String>,

    /// `"<part> - <description>"` for explicitly excluded quote lines
    pub excluded_items: Vec<String>,

    /// `"<part> (occurrence N)"` for repeated purchases of a part
    #[serde(default)]
    pub repeated_items: Vec<String>,
}

impl Schedule {
    /// Main (non sub-component) rows
    pub fn main_items(&self) -> impl Iterator<Item = &ScheduleLineItem> {
        self.items.iter().filter(|i| !i.is_sub_component)
    }

    /// Default output file stem: project name with non-alphanumerics replaced
    pub fn file_stem(&self) -> String {
        let name: String = self
            .project_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_Schedule", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(item_number: &str, amps: Option<CellValue>) -> ScheduleLineItem {
        ScheduleLineItem {
            item_number: item_number.to_string(),
            part_number: "P".to_string(),
            quantity: Quantity::blank(),
            description: String::new(),
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
            is_sub_component: item_number.ends_with(|c: char| c.is_ascii_alphabetic()),
            motor_label: None,
            occurrence: 1,
        }
    }

    #[test]
    fn test_amps_value_tolerates_text() {
        assert_eq!(row("1", Some(CellValue::Number(4.5))).amps_value(), 4.5);
        assert_eq!(row("1", Some(CellValue::from("12"))).amps_value(), 12.0);
        assert_eq!(row("1", Some(CellValue::from("varies"))).amps_value(), 0.0);
        assert_eq!(row("1", None).amps_value(), 0.0);
    }

    #[test]
    fn test_main_number() {
        assert_eq!(row("12", None).main_number(), Some(12));
        assert_eq!(row("12AB", None).main_number(), Some(12));
    }

    #[test]
    fn test_line_item_serializes_renderer_field_names() {
        let json = serde_json::to_value(row("3A", Some(CellValue::Number(2.0)))).unwrap();
        assert_eq!(json["itemNumber"], "3A");
        assert_eq!(json["amps"], 2.0);
        assert_eq!(json["isSubComponent"], true);
        assert!(json.get("flowRateGPM").is_some());
        assert!(json.get("heatOutputBTUH").is_some());
        assert!(json.get("breakerRating").is_some());
        assert!(json.get("motorLabel").is_none());
    }

    #[test]
    fn test_quantity_serialization() {
        assert_eq!(serde_json::to_string(&Quantity::Count(2)).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Quantity::placeholder()).unwrap(), "\"#\"");
    }

    #[test]
    fn test_voltage_table_accepts_both_spellings() {
        let t: VoltageTable = serde_yml::from_str("three_phase: 575\none_phase: 120\n").unwrap();
        assert_eq!(t, VoltageTable::new(575, 120));
        let t: VoltageTable = serde_json::from_str(r#"{"threePhase": 415, "onePhase": 240}"#).unwrap();
        assert_eq!(t.for_phase(Phase::Single), 240);
    }

    #[test]
    fn test_file_stem() {
        let schedule = Schedule {
            project_name: "Sunny Car Wash #2".to_string(),
            acknowledgment_number: "1".to_string(),
            country: "USA".to_string(),
            voltage_table: VoltageTable::new(460, 120),
            items: Vec::new(),
            total_motors: 0,
            total_amps: 0.0,
            not_found_items: Vec::new(),
            excluded_items: Vec::new(),
            repeated_items: Vec::new(),
        };
        assert_eq!(schedule.file_stem(), "Sunny_Car_Wash__2_Schedule");
    }
}
