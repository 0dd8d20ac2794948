//! Catalog entity types - equipment reference data keyed by part number

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A loosely-typed catalog value: a number or a free-text cell.
///
/// Catalog exports mix numbers (`10`), numeric strings (`"7.5"`) and
/// annotations (`"1/2"`, `"see note"`), so values are kept as written and
/// interpreted on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl CellValue {
    /// Numeric interpretation of this cell, if it has one.
    ///
    /// Accepts plain numbers, numeric strings and simple fractions (`"1/2"`).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Number(_) | CellValue::Flag(_) => None,
            CellValue::Text(s) => parse_number(s),
        }
    }

    /// True when the cell holds nothing meaningful (empty, `false` or a "-" filler)
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Number(_) => false,
            CellValue::Flag(set) => !set,
            CellValue::Text(s) => {
                let t = s.trim();
                t.is_empty() || t == "-"
            }
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Flag(true) => write!(f, "X"),
            CellValue::Flag(false) => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim().replace(',', "");
    if let Ok(n) = t.parse::<f64>() {
        return n.is_finite().then_some(n);
    }

    // Leading number or fraction with trailing units ("7.5HP", "1/2 HP", "460V")
    let end = t
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '/'))
        .unwrap_or(t.len());
    let lead = t[..end].trim_end_matches('/');
    if lead.is_empty() {
        return None;
    }
    match lead.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => lead.parse::<f64>().ok().filter(|n| n.is_finite()),
    }
}

/// Electrical supply phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Single,
    Three,
}

impl Phase {
    pub fn as_u8(self) -> u8 {
        match self {
            Phase::Single => 1,
            Phase::Three => 3,
        }
    }

    fn from_cell(cell: &CellValue) -> Option<Self> {
        match cell.as_number() {
            Some(n) if n == 1.0 => Some(Phase::Single),
            Some(n) if n == 3.0 => Some(Phase::Three),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cell = CellValue::deserialize(deserializer)?;
        Phase::from_cell(&cell)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid phase: {}", cell)))
    }
}

/// Deserialize an optional cell, mapping null, "" and "-" to `None`
fn optional_cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<CellValue>, D::Error> {
    let cell = Option::<CellValue>::deserialize(deserializer)?;
    Ok(cell.filter(|c| !c.is_blank()))
}

/// Deserialize a phase leniently: anything other than 1 or 3 is absent
fn optional_phase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Phase>, D::Error> {
    let cell = Option::<CellValue>::deserialize(deserializer)?;
    Ok(cell.as_ref().and_then(Phase::from_cell))
}

/// A single catalog row: one physical device and its utility requirements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Catalog part number
    #[serde(rename = "part_num", alias = "part_number")]
    pub part_number: String,

    /// Device description as printed on the schedule
    #[serde(default)]
    pub description: String,

    /// Horsepower
    #[serde(default, deserialize_with = "optional_cell", skip_serializing_if = "Option::is_none")]
    pub hp: Option<CellValue>,

    /// Supply phase (1 or 3)
    #[serde(default, deserialize_with = "optional_phase", skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,

    /// Native (nameplate) voltage
    #[serde(default, deserialize_with = "optional_cell", skip_serializing_if = "Option::is_none")]
    pub volts: Option<CellValue>,

    /// Native current draw at `volts`
    #[serde(default, deserialize_with = "optional_cell", skip_serializing_if = "Option::is_none")]
    pub amps: Option<CellValue>,

    /// Circuit breaker rating
    #[serde(
        rename = "cb",
        alias = "breaker_rating",
        default,
        deserialize_with = "optional_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub breaker_rating: Option<CellValue>,

    /// Plumbing port size
    #[serde(default, deserialize_with = "optional_cell", skip_serializing_if = "Option::is_none")]
    pub port: Option<CellValue>,

    /// Cold water connection
    #[serde(
        rename = "cold",
        alias = "cold_water",
        default,
        deserialize_with = "optional_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub cold_water: Option<CellValue>,

    /// Hot water connection
    #[serde(
        rename = "hot",
        alias = "hot_water",
        default,
        deserialize_with = "optional_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub hot_water: Option<CellValue>,

    /// Reclaim water connection
    #[serde(default, deserialize_with = "optional_cell", skip_serializing_if = "Option::is_none")]
    pub reclaim: Option<CellValue>,

    /// Water flow in gallons per minute
    #[serde(
        rename = "gal_min",
        alias = "flow_rate_gpm",
        default,
        deserialize_with = "optional_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub flow_rate_gpm: Option<CellValue>,

    /// Heat output in BTU/h
    #[serde(
        rename = "btuh",
        alias = "heat_output_btuh",
        default,
        deserialize_with = "optional_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub heat_output_btuh: Option<CellValue>,
}

impl CatalogRecord {
    /// Create a record with only a part number and description
    pub fn new(part_number: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_hp(mut self, hp: impl Into<CellValue>) -> Self {
        self.hp = Some(hp.into());
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_volts_amps(mut self, volts: f64, amps: f64) -> Self {
        self.volts = Some(CellValue::Number(volts));
        self.amps = Some(CellValue::Number(amps));
        self
    }
}

/// A purchasable catalog part: the main device plus its ordered sub-components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub main: CatalogRecord,

    /// Physical devices shipped with the main part, in catalog order
    #[serde(default)]
    pub sub_components: Vec<CatalogRecord>,
}

impl CatalogEntry {
    pub fn new(main: CatalogRecord, sub_components: Vec<CatalogRecord>) -> Self {
        Self {
            main,
            sub_components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_numbers() {
        assert_eq!(CellValue::Number(7.5).as_number(), Some(7.5));
        assert_eq!(CellValue::from("10").as_number(), Some(10.0));
        assert_eq!(CellValue::from(" 1,200 ").as_number(), Some(1200.0));
        assert_eq!(CellValue::from("1/2").as_number(), Some(0.5));
        assert_eq!(CellValue::from("see note").as_number(), None);
        assert_eq!(CellValue::from("1/0").as_number(), None);
    }

    #[test]
    fn test_cell_value_leading_number_with_units() {
        assert_eq!(CellValue::from("1/2 HP").as_number(), Some(0.5));
        assert_eq!(CellValue::from("7.5HP").as_number(), Some(7.5));
        assert_eq!(CellValue::from("460V").as_number(), Some(460.0));
        assert_eq!(CellValue::from("HP 5").as_number(), None);
        assert_eq!(CellValue::from("N/A").as_number(), None);
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(460.0).to_string(), "460");
        assert_eq!(CellValue::Number(5.25).to_string(), "5.25");
        assert_eq!(CellValue::from("3/4").to_string(), "3/4");
        assert_eq!(CellValue::Flag(true).to_string(), "X");
    }

    #[test]
    fn test_false_flag_is_blank() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"part_num": "X", "cold": false, "hot": true}"#).unwrap();
        assert!(record.cold_water.is_none());
        assert_eq!(record.hot_water, Some(CellValue::Flag(true)));
    }

    #[test]
    fn test_record_deserializes_export_field_names() {
        let json = r#"{
            "part_num": "BLW-10",
            "description": "Blower 10HP",
            "hp": 10,
            "phase": "3",
            "volts": 230,
            "amps": "28",
            "cb": 40,
            "gal_min": null,
            "btuh": "-"
        }"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.part_number, "BLW-10");
        assert_eq!(record.phase, Some(Phase::Three));
        assert_eq!(record.amps.as_ref().and_then(CellValue::as_number), Some(28.0));
        assert_eq!(record.breaker_rating, Some(CellValue::Number(40.0)));
        assert!(record.flow_rate_gpm.is_none());
        assert!(record.heat_output_btuh.is_none());
    }

    #[test]
    fn test_record_accepts_descriptive_aliases() {
        let yaml = "part_number: HTR-1\ndescription: Heater\nheat_output_btuh: 150000\nbreaker_rating: 20\n";
        let record: CatalogRecord = serde_yml::from_str(yaml).unwrap();

        assert_eq!(record.part_number, "HTR-1");
        assert_eq!(record.heat_output_btuh, Some(CellValue::Number(150000.0)));
        assert_eq!(record.breaker_rating, Some(CellValue::Number(20.0)));
    }

    #[test]
    fn test_unknown_phase_is_absent() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"part_num": "X", "phase": "DC"}"#).unwrap();
        assert!(record.phase.is_none());

        let record: CatalogRecord =
            serde_json::from_str(r#"{"part_num": "X", "phase": 1}"#).unwrap();
        assert_eq!(record.phase, Some(Phase::Single));
    }

    #[test]
    fn test_phase_serializes_as_number() {
        let record = CatalogRecord::new("P", "Pump").with_phase(Phase::Three);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"phase\":3"));
    }
}
