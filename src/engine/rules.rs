//! Effective derivation rules: exclusions, motor keywords and voltage tables

use miette::Diagnostic;
use thiserror::Error;

use crate::core::data::{builtin_exclusions, builtin_voltages};
use crate::core::{Config, DataError};
use crate::engine::voltage::VoltageTables;

/// Keywords marking a description as motorized when none are configured
pub const DEFAULT_MOTOR_KEYWORDS: &[&str] = &["MOTOR", "GEARMOTOR"];

/// Errors building the effective rules
#[derive(Debug, Error, Diagnostic)]
pub enum RulesError {
    #[error(transparent)]
    #[diagnostic(code(qsched::rules::data))]
    Data(#[from] DataError),

    #[error("Default country '{0}' has no voltage table")]
    #[diagnostic(
        code(qsched::rules::unknown_country),
        help("Add it under `voltages` in qsched.yaml or run `qsched countries`")
    )]
    UnknownDefaultCountry(String),
}

/// Everything the pipeline needs besides the catalog and the quote
#[derive(Debug, Clone)]
pub struct ScheduleRules {
    /// Substrings marking a part number as non-electrical
    pub exclusions: Vec<String>,
    /// Upper-cased motor keywords
    pub motor_keywords: Vec<String>,
    pub voltages: VoltageTables,
}

impl ScheduleRules {
    /// Rules from the embedded defaults alone
    pub fn builtin() -> Result<Self, RulesError> {
        Self::from_config(&Config::default())
    }

    /// Rules from the embedded defaults with configuration applied on top
    pub fn from_config(config: &Config) -> Result<Self, RulesError> {
        let builtin = builtin_voltages()?;

        let mut exclusions = match &config.excluded_parts {
            Some(parts) => parts.clone(),
            None => builtin_exclusions()?,
        };
        exclusions.extend(config.extra_excluded_parts.iter().cloned());
        exclusions.retain(|e| !e.trim().is_empty());

        let motor_keywords = match &config.motor_keywords {
            Some(keywords) => keywords.iter().map(|k| k.trim().to_uppercase()).collect(),
            None => DEFAULT_MOTOR_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        };

        let mut tables = builtin.countries;
        for (code, table) in &config.voltages {
            // Replace a built-in entry spelled differently rather than adding a twin
            let existing = tables
                .keys()
                .find(|k| k.eq_ignore_ascii_case(code))
                .cloned();
            tables.insert(existing.unwrap_or_else(|| code.clone()), *table);
        }

        let default_country = config
            .default_country
            .clone()
            .unwrap_or(builtin.default_country);
        let voltages = VoltageTables::new(&default_country, tables)
            .ok_or(RulesError::UnknownDefaultCountry(default_country))?;

        Ok(Self {
            exclusions,
            motor_keywords,
            voltages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::VoltageTable;

    #[test]
    fn test_builtin_rules() {
        let rules = ScheduleRules::builtin().unwrap();
        assert_eq!(rules.voltages.default_country(), "USA");
        assert!(rules.exclusions.iter().any(|e| e == "COMP-PRESS-GAUGE"));
        assert_eq!(rules.motor_keywords, vec!["MOTOR", "GEARMOTOR"]);
    }

    #[test]
    fn test_config_overrides() {
        let mut config = Config {
            default_country: Some("canada".to_string()),
            excluded_parts: Some(vec!["HOSE".to_string()]),
            extra_excluded_parts: vec!["NOZZLE".to_string(), " ".to_string()],
            motor_keywords: Some(vec!["pump".to_string()]),
            ..Default::default()
        };
        config
            .voltages
            .insert("usa".to_string(), VoltageTable::new(480, 120));

        let rules = ScheduleRules::from_config(&config).unwrap();
        assert_eq!(rules.voltages.default_country(), "Canada");
        assert_eq!(rules.exclusions, vec!["HOSE", "NOZZLE"]);
        assert_eq!(rules.motor_keywords, vec!["PUMP"]);
        assert_eq!(rules.voltages.lookup("USA").1, VoltageTable::new(480, 120));
    }

    #[test]
    fn test_unknown_default_country() {
        let config = Config {
            default_country: Some("Atlantis".to_string()),
            ..Default::default()
        };
        let err = ScheduleRules::from_config(&config).unwrap_err();
        assert!(matches!(err, RulesError::UnknownDefaultCountry(c) if c == "Atlantis"));
    }
}
