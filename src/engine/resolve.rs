//! Catalog resolution: ranked match tiers from strict to fuzzy

use std::fmt;
use tracing::debug;

use crate::core::Catalog;
use crate::entities::CatalogEntry;

/// Shortest base segment allowed to match in the base-segment tier
pub const MIN_BASE_SEGMENT_LEN: usize = 3;

/// How a part number was matched to a catalog key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// Identical strings
    Exact,
    /// One string is a prefix of the other (option suffixes)
    Prefix,
    /// Same text before the first dash
    BaseSegment,
}

impl MatchTier {
    /// Tiers in precedence order
    pub const ALL: [MatchTier; 3] = [MatchTier::Exact, MatchTier::Prefix, MatchTier::BaseSegment];

    /// Catalog key this tier matches for `part_number`, looked at in isolation
    pub fn find<'c>(self, catalog: &'c Catalog, part_number: &str) -> Option<&'c str> {
        match self {
            MatchTier::Exact => catalog.get_key_value(part_number).map(|(k, _)| k),
            MatchTier::Prefix => find_prefix(catalog, part_number),
            MatchTier::BaseSegment => find_base_segment(catalog, part_number),
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "exact"),
            MatchTier::Prefix => write!(f, "prefix"),
            MatchTier::BaseSegment => write!(f, "base-segment"),
        }
    }
}

/// A successful catalog lookup
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'c> {
    pub key: &'c str,
    pub entry: &'c CatalogEntry,
    pub tier: MatchTier,
}

/// Resolve a part number, trying each tier in order
pub fn resolve<'c>(catalog: &'c Catalog, part_number: &str) -> Option<Resolution<'c>> {
    let part_number = part_number.trim();
    if part_number.is_empty() {
        return None;
    }

    MatchTier::ALL.iter().find_map(|&tier| {
        let key = tier.find(catalog, part_number)?;
        let entry = catalog.get(key)?;
        if tier != MatchTier::Exact {
            debug!(part = part_number, key, %tier, "Fuzzy catalog match");
        }
        Some(Resolution { key, entry, tier })
    })
}

/// Prefix tier.
///
/// A catalog key that is a prefix of the part number (ordered part with
/// option suffixes) is preferred, longest first. Failing that, the shortest
/// key that extends the part number wins. Equal lengths go by key order.
fn find_prefix<'c>(catalog: &'c Catalog, part_number: &str) -> Option<&'c str> {
    let keys = || catalog.iter().map(|(k, _)| k);

    let base = keys()
        .filter(|k| !k.is_empty() && part_number.starts_with(k))
        .fold(None, |best: Option<&str>, k| match best {
            Some(b) if b.len() >= k.len() => Some(b),
            _ => Some(k),
        });
    if base.is_some() {
        return base;
    }

    keys()
        .filter(|k| k.starts_with(part_number))
        .fold(None, |best: Option<&str>, k| match best {
            Some(b) if b.len() <= k.len() => Some(b),
            _ => Some(k),
        })
}

/// Base-segment tier: a key equal to the base wins, else the first key sharing it
fn find_base_segment<'c>(catalog: &'c Catalog, part_number: &str) -> Option<&'c str> {
    let base = base_segment(part_number);
    if base.chars().count() < MIN_BASE_SEGMENT_LEN {
        return None;
    }

    let mut candidates = catalog
        .iter()
        .map(|(k, _)| k)
        .filter(|k| base_segment(k) == base)
        .peekable();
    let first = *candidates.peek()?;
    Some(candidates.find(|k| *k == base).unwrap_or(first))
}

/// Text before the first dash
pub fn base_segment(part_number: &str) -> &str {
    part_number.split('-').next().unwrap_or(part_number)
}
