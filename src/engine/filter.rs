//! Exclusion and repeat tracking for quote line items

use std::collections::HashMap;
use tracing::{info, warn};

use crate::entities::QuoteLineItem;

/// Where a resolved line falls among purchases of the same catalog part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// First purchase of this catalog part in the quote
    First,
    /// A later purchase of a catalog part already scheduled
    Repeat(u32),
}

impl Occurrence {
    pub fn number(self) -> u32 {
        match self {
            Occurrence::First => 1,
            Occurrence::Repeat(n) => n,
        }
    }
}

/// Per-quote filter state.
///
/// Exclusion is decided on the quoted part number, before resolution.
/// Occurrences are counted per resolved catalog key, so `RC4` and `RC4-SS`
/// resolving to the same entry count as one part, and lines that never
/// resolve are never counted.
///
/// Repeats are counted, never dropped: every purchased line is resolved
/// and scheduled. Skipping repeats outright, or skipping them only when
/// the quoted quantity is 1 or less, both lose paid-for equipment from
/// the schedule and are not supported.
#[derive(Debug)]
pub struct LineFilter<'r> {
    exclusions: &'r [String],
    occurrences: HashMap<String, u32>,
}

impl<'r> LineFilter<'r> {
    pub fn new(exclusions: &'r [String]) -> Self {
        Self {
            exclusions,
            occurrences: HashMap::new(),
        }
    }

    /// The exclusion entry contained in `part_number`, if any
    pub fn exclusion_for(&self, part_number: &str) -> Option<&'r str> {
        self.exclusions
            .iter()
            .map(String::as_str)
            .find(|e| !e.is_empty() && part_number.contains(e))
    }

    /// True for known non-electrical parts, which are reported and never resolved
    pub fn excludes(&self, item: &QuoteLineItem) -> bool {
        match self.exclusion_for(&item.part_number) {
            Some(rule) => {
                info!(part = %item.part_number, rule, "Excluding non-electrical item");
                true
            }
            None => false,
        }
    }

    /// Count one more purchase of the catalog part `key`
    pub fn record(&mut self, key: &str) -> Occurrence {
        let count = self.occurrences.entry(key.to_string()).or_insert(0);
        *count += 1;

        if *count == 1 {
            Occurrence::First
        } else {
            warn!(part = key, occurrence = *count, "Catalog part repeated in quote");
            Occurrence::Repeat(*count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclusions() -> Vec<String> {
        vec!["MCC-460".to_string(), "COMP-PRESS-GAUGE".to_string()]
    }

    #[test]
    fn test_exclusion_is_substring_match() {
        let rules = exclusions();
        let filter = LineFilter::new(&rules);
        let item = QuoteLineItem::new("MCC-460-X", "Motor control center", 1);
        assert!(filter.excludes(&item));
        assert!(!filter.excludes(&QuoteLineItem::new("RC4", "Roller", 1)));
        assert_eq!(filter.exclusion_for("XMCC-460"), Some("MCC-460"));
        assert_eq!(filter.exclusion_for("MCC-5"), None);
    }

    #[test]
    fn test_empty_exclusion_matches_nothing() {
        let rules = vec![String::new()];
        let filter = LineFilter::new(&rules);
        assert_eq!(filter.exclusion_for("RC4"), None);
    }

    #[test]
    fn test_repeats_are_counted_per_key() {
        let rules = exclusions();
        let mut filter = LineFilter::new(&rules);

        assert_eq!(filter.record("RC4"), Occurrence::First);
        assert_eq!(filter.record("RC4"), Occurrence::Repeat(2));
        assert_eq!(filter.record("RC4"), Occurrence::Repeat(3));
        assert_eq!(filter.record("BLW-10"), Occurrence::First);
    }

    #[test]
    fn test_exclusion_does_not_count() {
        let rules = exclusions();
        let filter = LineFilter::new(&rules);
        let item = QuoteLineItem::new("MCC-460", "MCC", 1);
        assert!(filter.excludes(&item));
        assert!(filter.excludes(&item));
        assert!(filter.occurrences.is_empty());
    }

    #[test]
    fn test_occurrence_number() {
        assert_eq!(Occurrence::First.number(), 1);
        assert_eq!(Occurrence::Repeat(4).number(), 4);
    }
}
