//! Destination-country voltage tables and country detection

use std::collections::BTreeMap;
use tracing::warn;

use crate::entities::VoltageTable;

/// Address keywords identifying each built-in country, matched as whole words
const COUNTRY_KEYWORDS: &[(&str, &[&str])] = &[
    ("USA", &["USA", "UNITED STATES"]),
    ("Canada", &["CANADA"]),
    ("Australia", &["AUSTRALIA"]),
    ("UK", &["UK", "UNITED KINGDOM"]),
    ("Mexico", &["MEXICO"]),
];

/// Voltage tables keyed by country code, with a default country
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageTables {
    default_country: String,
    tables: BTreeMap<String, VoltageTable>,
}

impl VoltageTables {
    /// Build a table set; `None` if the default country has no table
    pub fn new(default_country: &str, tables: BTreeMap<String, VoltageTable>) -> Option<Self> {
        let default_country = find_key(&tables, default_country)?.to_string();
        Some(Self {
            default_country,
            tables,
        })
    }

    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    /// Canonical code for a country, matched case-insensitively
    pub fn canonical(&self, code: &str) -> Option<&str> {
        find_key(&self.tables, code)
    }

    /// Table for a country code; unknown codes fall back to the default country.
    ///
    /// Returns the code whose table was actually used.
    pub fn lookup(&self, code: &str) -> (&str, VoltageTable) {
        let key = match self.canonical(code) {
            Some(key) => key,
            None => {
                warn!(
                    country = %code,
                    fallback = %self.default_country,
                    "Unknown country, using default voltage table"
                );
                &self.default_country
            }
        };
        let table = self.tables.get(key).copied().unwrap_or(VoltageTable::new(0, 0));
        (key, table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VoltageTable)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn find_key<'t>(tables: &'t BTreeMap<String, VoltageTable>, code: &str) -> Option<&'t str> {
    let code = code.trim();
    tables
        .keys()
        .find(|k| k.eq_ignore_ascii_case(code))
        .map(String::as_str)
}

/// Detect the destination country from a shipping address.
///
/// Keywords are matched as whole words so that e.g. "MILWAUKEE" does not
/// read as "UK". No match yields `default_country`.
pub fn detect_country(address: &str, default_country: &str) -> String {
    let normalized: String = address
        .to_uppercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let padded = format!(" {} ", normalized.split_whitespace().collect::<Vec<_>>().join(" "));

    COUNTRY_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|kw| padded.contains(&format!(" {} ", kw)))
        })
        .map(|(country, _)| country.to_string())
        .unwrap_or_else(|| default_country.to_string())
}
