//! Built-in reference data embedded in the binary

use rust_embed::Embed;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::entities::VoltageTable;

#[derive(Embed)]
#[folder = "data/"]
struct EmbeddedData;

/// Errors reading embedded data files
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Embedded data file not found: {0}")]
    Missing(&'static str),

    #[error("Embedded data file {file} is malformed: {message}")]
    Malformed { file: &'static str, message: String },
}

/// Built-in voltage tables
#[derive(Debug, Clone, Deserialize)]
pub struct BuiltinVoltages {
    pub default_country: String,
    pub countries: BTreeMap<String, VoltageTable>,
}

fn load_yaml<T: serde::de::DeserializeOwned + 'static>(file: &'static str) -> Result<T, DataError> {
    let content = EmbeddedData::get(file).ok_or(DataError::Missing(file))?;
    let malformed = |message: String| DataError::Malformed { file, message };
    let text = std::str::from_utf8(&content.data).map_err(|e| malformed(e.to_string()))?;
    serde_yml::from_str(text).map_err(|e| malformed(e.to_string()))
}

/// Default per-country voltage tables
pub fn builtin_voltages() -> Result<BuiltinVoltages, DataError> {
    load_yaml("voltages.yaml")
}

/// Default list of non-electrical part numbers
pub fn builtin_exclusions() -> Result<Vec<String>, DataError> {
    load_yaml("excluded_parts.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_voltages() {
        let voltages = builtin_voltages().unwrap();
        assert_eq!(voltages.default_country, "USA");
        assert_eq!(voltages.countries["USA"], VoltageTable::new(460, 120));
        assert_eq!(voltages.countries["Canada"], VoltageTable::new(575, 120));
        assert_eq!(voltages.countries["Mexico"], VoltageTable::new(460, 127));
        assert!(voltages.countries.contains_key(&voltages.default_country));
    }

    #[test]
    fn test_builtin_exclusions() {
        let exclusions = builtin_exclusions().unwrap();
        assert!(exclusions.iter().any(|e| e == "MCC-460"));
        assert!(exclusions.iter().all(|e| !e.trim().is_empty()));
    }
}
