//! Hierarchy expansion of a catalog entry into numbered schedule rows
//!
//! Sub-components are first arranged into a two-level tree: a sub-component
//! matching a grouping rule adopts the run of following sub-components the
//! rule accepts. Numbering then walks the tree. Top-level nodes get `A`,
//! `B`, ... after the main number and each node's children get a second
//! letter starting again at `A`.
//!
//! Description text is never interpreted as a nesting marker.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::catalog_loader::MAX_SUB_COMPONENTS;
use crate::engine::motor::MotorDetector;
use crate::entities::{CatalogEntry, CatalogRecord};

#[derive(Debug, Error, Diagnostic)]
pub enum ExpandError {
    #[error("Catalog entry {part} has too many sub-components to letter")]
    #[diagnostic(code(qsched::expand::letters))]
    OutOfLetters { part: String },
}

/// Parent/child device pairings recognized among sub-components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingRule {
    /// A blower followed by its drive motor
    BlowerDrive,
    /// A control panel or enclosure followed by its solenoids
    PanelSolenoids,
    /// An electrical assembly followed by the motors it feeds
    ElectricalMotors,
}

impl GroupingRule {
    /// Rules in the order they are tried
    pub const ALL: [GroupingRule; 3] = [
        GroupingRule::BlowerDrive,
        GroupingRule::PanelSolenoids,
        GroupingRule::ElectricalMotors,
    ];

    pub fn is_parent(self, record: &CatalogRecord) -> bool {
        let desc = record.description.to_uppercase();
        let part = record.part_number.to_uppercase();
        match self {
            GroupingRule::BlowerDrive => {
                desc.contains("BLOWER") || part.contains("BLW") || part.contains("BLOWER")
            }
            GroupingRule::PanelSolenoids => desc.contains("PANEL") || desc.contains("ENCLOSURE"),
            GroupingRule::ElectricalMotors => {
                desc.contains("ELECTRICAL") || part.starts_with("ELEC") || part.contains("-ELEC")
            }
        }
    }

    pub fn accepts_child(self, record: &CatalogRecord, motors: &MotorDetector) -> bool {
        match self {
            GroupingRule::BlowerDrive | GroupingRule::ElectricalMotors => {
                motors.is_motor_record(record)
            }
            GroupingRule::PanelSolenoids => {
                record.description.to_uppercase().contains("SOLENOID")
                    || record.part_number.to_uppercase().starts_with("SOL")
            }
        }
    }

    /// How many following sub-components the parent may adopt
    pub fn max_children(self) -> usize {
        match self {
            GroupingRule::BlowerDrive => 1,
            GroupingRule::PanelSolenoids | GroupingRule::ElectricalMotors => usize::MAX,
        }
    }
}

/// A top-level sub-component and the sub-components nested under it
#[derive(Debug, Clone, PartialEq)]
pub struct SubComponentNode<'c> {
    pub record: &'c CatalogRecord,
    pub rule: Option<GroupingRule>,
    pub children: Vec<&'c CatalogRecord>,
}

/// Arrange sub-components into the two-level tree, preserving catalog order
pub fn build_tree<'c>(
    sub_components: &'c [CatalogRecord],
    motors: &MotorDetector,
) -> Vec<SubComponentNode<'c>> {
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < sub_components.len() {
        let record = &sub_components[i];
        i += 1;

        let rule = sub_components.get(i).and_then(|next| {
            GroupingRule::ALL
                .into_iter()
                .find(|r| r.is_parent(record) && r.accepts_child(next, motors))
        });

        let mut children = Vec::new();
        if let Some(rule) = rule {
            while let Some(next) = sub_components.get(i) {
                if children.len() >= rule.max_children() || !rule.accepts_child(next, motors) {
                    break;
                }
                children.push(next);
                i += 1;
            }
        }

        nodes.push(SubComponentNode {
            record,
            rule,
            children,
        });
    }

    nodes
}

/// One numbered row before electrical derivation
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedRow<'c> {
    pub item_number: String,
    pub record: &'c CatalogRecord,
    pub is_sub_component: bool,
}

/// Letter for a zero-based position, `None` past `Z`
pub fn letter(index: usize) -> Option<char> {
    (index < MAX_SUB_COMPONENTS).then(|| char::from(b'A' + index as u8))
}

/// Main row followed by the lettered sub-component rows
pub fn expand<'c>(
    entry: &'c CatalogEntry,
    main_number: u32,
    motors: &MotorDetector,
) -> Result<Vec<ExpandedRow<'c>>, ExpandError> {
    let out_of_letters = || ExpandError::OutOfLetters {
        part: entry.main.part_number.clone(),
    };

    let main = main_number.to_string();
    let mut rows = vec![ExpandedRow {
        item_number: main.clone(),
        record: &entry.main,
        is_sub_component: false,
    }];

    for (i, node) in build_tree(&entry.sub_components, motors).iter().enumerate() {
        let top = letter(i).ok_or_else(out_of_letters)?;
        rows.push(ExpandedRow {
            item_number: format!("{}{}", main, top),
            record: node.record,
            is_sub_component: true,
        });

        for (j, child) in node.children.iter().enumerate() {
            let nested = letter(j).ok_or_else(out_of_letters)?;
            rows.push(ExpandedRow {
                item_number: format!("{}{}{}", main, top, nested),
                record: *child,
                is_sub_component: true,
            });
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motors() -> MotorDetector {
        MotorDetector::new(&["MOTOR".to_string(), "GEARMOTOR".to_string()])
    }

    fn numbers(rows: &[ExpandedRow]) -> Vec<String> {
        rows.iter().map(|r| r.item_number.clone()).collect()
    }

    #[test]
    fn test_standalone_sub_components() {
        let entry = CatalogEntry::new(
            CatalogRecord::new("RC4", "Roller Correlator"),
            vec![
                CatalogRecord::new("RC4-GUIDE", "Guide Rail"),
                CatalogRecord::new("RC4-SENSOR", "Tire Sensor"),
                CatalogRecord::new("RC4-PLATE", "Entry Plate"),
            ],
        );
        let rows = expand(&entry, 5, &motors()).unwrap();
        assert_eq!(numbers(&rows), vec!["5", "5A", "5B", "5C"]);
        assert!(!rows[0].is_sub_component);
        assert!(rows[1..].iter().all(|r| r.is_sub_component));
    }

    #[test]
    fn test_blower_adopts_one_motor() {
        let entry = CatalogEntry::new(
            CatalogRecord::new("DRY", "Dryer"),
            vec![
                CatalogRecord::new("BLW-10", "Blower Housing"),
                CatalogRecord::new("MTR-10", "Blower Motor").with_hp(10.0),
                CatalogRecord::new("MTR-11", "Spare Motor").with_hp(10.0),
                CatalogRecord::new("NOZ", "Nozzle"),
            ],
        );
        let rows = expand(&entry, 2, &motors()).unwrap();
        assert_eq!(numbers(&rows), vec!["2", "2A", "2AA", "2B", "2C"]);
        assert_eq!(rows[2].record.part_number, "MTR-10");
    }

    #[test]
    fn test_panel_adopts_solenoid_run() {
        let entry = CatalogEntry::new(
            CatalogRecord::new("ARCH", "Arch"),
            vec![
                CatalogRecord::new("CP-1", "Control Panel"),
                CatalogRecord::new("SOL-1", "Water Solenoid"),
                CatalogRecord::new("SOL-2", "Air Solenoid"),
                CatalogRecord::new("ELEC-BOX", "Electrical Box"),
                CatalogRecord::new("GM-1", "Gearmotor"),
                CatalogRecord::new("GM-2", "Gearmotor"),
            ],
        );
        let tree = build_tree(&entry.sub_components, &motors());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].rule, Some(GroupingRule::PanelSolenoids));
        assert_eq!(tree[1].rule, Some(GroupingRule::ElectricalMotors));

        let rows = expand(&entry, 1, &motors()).unwrap();
        // nested letters restart under each top-level letter
        assert_eq!(numbers(&rows), vec!["1", "1A", "1AA", "1AB", "1B", "1BA", "1BB"]);
    }

    #[test]
    fn test_parent_without_matching_child_stands_alone() {
        let entry = CatalogEntry::new(
            CatalogRecord::new("X", "X"),
            vec![
                CatalogRecord::new("CP-1", "Control Panel"),
                CatalogRecord::new("GM-1", "Gearmotor"),
            ],
        );
        let tree = build_tree(&entry.sub_components, &motors());
        assert_eq!(tree.len(), 2);
        assert!(tree.iter().all(|n| n.rule.is_none() && n.children.is_empty()));
    }

    #[test]
    fn test_double_dash_descriptions_are_literal() {
        let entry = CatalogEntry::new(
            CatalogRecord::new("X", "X"),
            vec![
                CatalogRecord::new("A-1", "Pump Stand"),
                CatalogRecord::new("A-2", "--Pump Mount"),
            ],
        );
        let rows = expand(&entry, 3, &motors()).unwrap();
        assert_eq!(numbers(&rows), vec!["3", "3A", "3B"]);
        assert_eq!(rows[2].record.description, "--Pump Mount");
    }

    #[test]
    fn test_letter() {
        assert_eq!(letter(0), Some('A'));
        assert_eq!(letter(25), Some('Z'));
        assert_eq!(letter(26), None);
    }
}
