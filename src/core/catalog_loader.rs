//! Equipment catalog loading and the read-only catalog index

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::entities::CatalogEntry;

/// Sub-components beyond this count cannot be given a single letter
pub const MAX_SUB_COMPONENTS: usize = 26;

/// Errors loading or validating an equipment catalog
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("Cannot read catalog {path}: {message}")]
    #[diagnostic(code(qsched::catalog::io))]
    Io { path: PathBuf, message: String },

    #[error("Unsupported catalog file type: {path}")]
    #[diagnostic(
        code(qsched::catalog::extension),
        help("Catalogs must be .json, .yaml or .yml files")
    )]
    UnsupportedExtension { path: PathBuf },

    #[error("Invalid catalog {path}: {message}")]
    #[diagnostic(code(qsched::catalog::parse))]
    Parse { path: PathBuf, message: String },

    #[error("Catalog entry has an empty part number")]
    #[diagnostic(code(qsched::catalog::empty_part_number))]
    EmptyPartNumber,

    #[error("Catalog entry {part} has {count} sub-components (at most 26 allowed)")]
    #[diagnostic(
        code(qsched::catalog::too_many_sub_components),
        help("Split the entry; sub-components are lettered A through Z")
    )]
    TooManySubComponents { part: String, count: usize },
}

/// Read-only catalog index keyed by catalog part number.
///
/// Built once and shared by reference between pipeline runs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from entries, validating each one
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, CatalogEntry)>,
    ) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (key, mut entry) in entries {
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(CatalogError::EmptyPartNumber);
            }
            if entry.sub_components.len() > MAX_SUB_COMPONENTS {
                return Err(CatalogError::TooManySubComponents {
                    count: entry.sub_components.len(),
                    part: key,
                });
            }
            if entry.main.part_number.trim().is_empty() {
                entry.main.part_number = key.clone();
            }
            index.insert(key, entry);
        }
        Ok(Self { entries: index })
    }

    /// Load a catalog file, choosing the parser from the extension
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let parse_err = |message: String| CatalogError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let entries: BTreeMap<String, CatalogEntry> = match ext.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))?,
            Some("yaml") | Some("yml") => {
                serde_yml::from_str(&content).map_err(|e| parse_err(e.to_string()))?
            }
            _ => {
                return Err(CatalogError::UnsupportedExtension {
                    path: path.to_path_buf(),
                })
            }
        };

        let catalog = Self::from_entries(entries)?;
        info!(path = %path.display(), entries = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    /// Entry with its stored key
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &CatalogEntry)> {
        self.entries.get_key_value(key).map(|(k, v)| (k.as_str(), v))
    }

    /// All entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CatalogRecord;
    use tempfile::tempdir;

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{
                "RC4": {
                    "main": {"part_num": "RC4", "description": "Roller Correlator", "hp": "", "phase": "3", "volts": 230, "amps": "10"},
                    "sub_components": [{"part_num": "RC4-MTR", "description": "Drive Motor", "hp": 2}]
                }
            }"#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        let entry = catalog.get("RC4").unwrap();
        assert!(entry.main.hp.is_none());
        assert_eq!(entry.sub_components.len(), 1);
        assert_eq!(entry.sub_components[0].part_number, "RC4-MTR");
    }

    #[test]
    fn test_load_yaml_fills_missing_main_part_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.yml");
        std::fs::write(
            &path,
            "DRYER-20:\n  main:\n    part_num: \"\"\n    description: Dryer\n",
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.get("DRYER-20").unwrap().main.part_number, "DRYER-20");
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.xlsx");
        std::fs::write(&path, "").unwrap();

        let err = Catalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedExtension { .. }));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Catalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_validation() {
        let entry = CatalogEntry::new(CatalogRecord::new("X", "x"), Vec::new());
        let err = Catalog::from_entries(vec![("  ".to_string(), entry)]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyPartNumber));

        let subs = (0..27)
            .map(|i| CatalogRecord::new(format!("S{}", i), "sub"))
            .collect();
        let entry = CatalogEntry::new(CatalogRecord::new("BIG", "big"), subs);
        let err = Catalog::from_entries(vec![("BIG".to_string(), entry)]).unwrap_err();
        assert!(matches!(err, CatalogError::TooManySubComponents { count: 27, .. }));
    }
}
