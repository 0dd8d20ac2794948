//! Per-country electrical parameter derivation
//!
//! Supply voltage follows the destination country's table for the record's
//! phase. When that changes the voltage, amps are rescaled so apparent power
//! stays constant: `amps = native_volts * native_amps / derived_volts`. This
//! is an approximation, not nameplate data.

use crate::entities::{CatalogRecord, CellValue, ElectricalAttrs, VoltageTable};

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Electrical attributes of `record` installed under `table`
pub fn derive(record: &CatalogRecord, table: &VoltageTable) -> ElectricalAttrs {
    let volts = match record.phase {
        Some(phase) => Some(CellValue::Number(f64::from(table.for_phase(phase)))),
        None => record.volts.clone(),
    };

    ElectricalAttrs {
        hp: record.hp.clone(),
        phase: record.phase,
        amps: rescale_amps(record, volts.as_ref()),
        volts,
        breaker_rating: record.breaker_rating.clone(),
    }
}

fn rescale_amps(record: &CatalogRecord, derived_volts: Option<&CellValue>) -> Option<CellValue> {
    let native = record.volts.as_ref().and_then(CellValue::as_number);
    let amps = record.amps.as_ref().and_then(CellValue::as_number);
    let derived = derived_volts.and_then(CellValue::as_number);

    match (native, amps, derived) {
        (Some(nv), Some(na), Some(dv)) if nv > 0.0 && dv > 0.0 && nv != dv => {
            Some(CellValue::Number(round2(nv * na / dv)))
        }
        _ => record.amps.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Phase;

    fn usa() -> VoltageTable {
        VoltageTable::new(460, 120)
    }

    #[test]
    fn test_three_phase_halves_amps() {
        let record = CatalogRecord::new("P", "Pump")
            .with_phase(Phase::Three)
            .with_volts_amps(230.0, 10.0);
        let attrs = derive(&record, &usa());
        assert_eq!(attrs.volts, Some(CellValue::Number(460.0)));
        assert_eq!(attrs.amps, Some(CellValue::Number(5.0)));
    }

    #[test]
    fn test_single_phase_uses_one_phase_voltage() {
        let record = CatalogRecord::new("L", "Light")
            .with_phase(Phase::Single)
            .with_volts_amps(230.0, 3.0);
        let attrs = derive(&record, &usa());
        assert_eq!(attrs.volts, Some(CellValue::Number(120.0)));
        assert_eq!(attrs.amps, Some(CellValue::Number(5.75)));
    }

    #[test]
    fn test_unchanged_voltage_keeps_amps() {
        let record = CatalogRecord::new("P", "Pump")
            .with_phase(Phase::Three)
            .with_volts_amps(460.0, 7.3);
        let attrs = derive(&record, &usa());
        assert_eq!(attrs.amps, Some(CellValue::Number(7.3)));
    }

    #[test]
    fn test_no_phase_keeps_native_values() {
        let mut record = CatalogRecord::new("H", "Heater");
        record.volts = Some(CellValue::from("24 VAC"));
        record.amps = Some(CellValue::from("2"));
        let attrs = derive(&record, &usa());
        assert_eq!(attrs.volts, Some(CellValue::from("24 VAC")));
        assert_eq!(attrs.amps, Some(CellValue::from("2")));
    }

    #[test]
    fn test_missing_native_amps() {
        let mut record = CatalogRecord::new("P", "Pump").with_phase(Phase::Three);
        record.volts = Some(CellValue::Number(230.0));
        let attrs = derive(&record, &usa());
        assert_eq!(attrs.volts, Some(CellValue::Number(460.0)));
        assert!(attrs.amps.is_none());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005 * 1000.0), 1005.0);
        assert_eq!(round2(10.0 / 3.0), 3.33);
    }
}
