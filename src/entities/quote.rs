//! Quote entity types - line items and metadata extracted from quote text

use serde::{Deserialize, Serialize};

/// A single purchased line recognized in the quote text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    /// Part number as printed on the quote
    pub part_number: String,

    /// Whitespace-normalized description
    pub description: String,

    /// Quoted quantity (0 when the quote did not state one)
    pub quantity: u32,
}

impl QuoteLineItem {
    pub fn new(part_number: impl Into<String>, description: impl Into<String>, quantity: u32) -> Self {
        Self {
            part_number: part_number.into(),
            description: description.into(),
            quantity,
        }
    }

    /// Diagnostic label used in not-found and excluded lists
    pub fn label(&self) -> String {
        format!("{} - {}", self.part_number, self.description)
    }
}

/// Structural shape of the quote text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteFormat {
    /// Priced sales order / quote (qty, unit price, total, tax marker)
    SalesOrder,
    /// Pre-populated electrical schedule (tabular, terminated by TOTAL)
    Schedule,
}

impl std::fmt::Display for QuoteFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteFormat::SalesOrder => write!(f, "sales order"),
            QuoteFormat::Schedule => write!(f, "schedule"),
        }
    }
}

/// Everything the extractor recognizes in one quote text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteDocument {
    /// Which extraction strategy was applied
    pub format: QuoteFormat,

    /// Acknowledgment / quote / project number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledgment_number: Option<String>,

    /// Project name (first line of the ship-to block)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Ship-to address, whitespace-normalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<String>,

    /// Country code detected from the ship-to address
    pub detected_country: String,

    /// Line items in document order
    #[serde(default)]
    pub items: Vec<QuoteLineItem>,
}

impl QuoteDocument {
    /// Project name for labeling, with a fixed fallback
    pub fn project_label(&self) -> &str {
        self.project_name.as_deref().unwrap_or("Unknown Project")
    }

    /// Acknowledgment number for labeling, with a fixed fallback
    pub fn acknowledgment_label(&self) -> &str {
        self.acknowledgment_number.as_deref().unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_label() {
        let item = QuoteLineItem::new("RC4", "Roller Correlator", 1);
        assert_eq!(item.label(), "RC4 - Roller Correlator");
    }

    #[test]
    fn test_document_fallback_labels() {
        let doc = QuoteDocument {
            format: QuoteFormat::SalesOrder,
            acknowledgment_number: None,
            project_name: None,
            ship_to: None,
            detected_country: "USA".to_string(),
            items: Vec::new(),
        };
        assert_eq!(doc.project_label(), "Unknown Project");
        assert_eq!(doc.acknowledgment_label(), "Unknown");
    }

    #[test]
    fn test_format_serialization() {
        let yaml = serde_yml::to_string(&QuoteFormat::SalesOrder).unwrap();
        assert!(yaml.contains("sales_order"));
    }
}
