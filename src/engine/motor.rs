//! Motor detection and sequential motor labels

use crate::entities::{CatalogRecord, CellValue};

/// Decides whether a row is motorized
#[derive(Debug, Clone)]
pub struct MotorDetector {
    keywords: Vec<String>,
}

impl MotorDetector {
    /// `keywords` are matched case-insensitively
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.trim().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Motorized if the description names a motor keyword or horsepower is
    /// a positive number
    pub fn is_motor(&self, description: &str, hp: Option<&CellValue>) -> bool {
        let upper = description.to_uppercase();
        self.keywords.iter().any(|k| upper.contains(k.as_str()))
            || hp.and_then(CellValue::as_number).is_some_and(|n| n > 0.0)
    }

    pub fn is_motor_record(&self, record: &CatalogRecord) -> bool {
        self.is_motor(&record.description, record.hp.as_ref())
    }
}

/// Hands out `M-1`, `M-2`, ... in emission order for one schedule
#[derive(Debug, Default)]
pub struct MotorCounter {
    issued: u32,
}

impl MotorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next motor number and its label
    pub fn next_label(&mut self) -> (u32, String) {
        self.issued += 1;
        (self.issued, format!("M-{}", self.issued))
    }
}
