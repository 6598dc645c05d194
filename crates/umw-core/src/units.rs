//! Fixed multiplier table for converting measurements to base units.
//!
//! Frequencies go to Hz, lengths go to nm. Unit symbols are matched exactly
//! after trimming. Anything else passes through unchanged.

use crate::entities::QuantitativeData;

pub const HZ: &str = "Hz";
pub const NM: &str = "nm";

const CONVERSIONS: &[(&str, f64, &str)] = &[
    ("kHz", 1e3, HZ),
    ("MHz", 1e6, HZ),
    ("GHz", 1e9, HZ),
    ("mm", 1e6, NM),
    ("cm", 1e7, NM),
    ("m", 1e9, NM),
    ("µm", 1e3, NM),
    ("μm", 1e3, NM),
    ("um", 1e3, NM),
];

/// Multiplier and base unit for `unit`, or `None` if it is already a base
/// unit or not in the table.
#[must_use]
pub fn conversion_for(unit: &str) -> Option<(f64, &'static str)> {
    let unit = unit.trim();
    CONVERSIONS
        .iter()
        .find(|(symbol, _, _)| *symbol == unit)
        .map(|(_, factor, base)| (*factor, *base))
}

/// Convert one `(value, unit)` pair.
#[must_use]
pub fn to_base_unit(value: f64, unit: &str) -> (f64, String) {
    match conversion_for(unit) {
        Some((factor, base)) => (value * factor, base.to_string()),
        None => (value, unit.to_string()),
    }
}

/// Apply the conversion to both bounds of a quantitative block.
#[must_use]
pub fn normalize_quantitative(data: &QuantitativeData) -> QuantitativeData {
    let Some((factor, base)) = data.unit.as_deref().and_then(conversion_for) else {
        return data.clone();
    };
    QuantitativeData {
        min: data.min.map(|v| v * factor),
        max: data.max.map(|v| v * factor),
        unit: Some(base.to_string()),
        context: data.context.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn block(min: Option<f64>, max: Option<f64>, unit: &str) -> QuantitativeData {
        QuantitativeData {
            min,
            max,
            unit: Some(unit.to_string()),
            context: Some("Hearing range".to_string()),
        }
    }

    #[test]
    fn khz_block_converts_to_hz() {
        let converted = normalize_quantitative(&block(Some(5.0), Some(10.0), "kHz"));
        assert_eq!(converted, block(Some(5000.0), Some(10000.0), "Hz"));
    }

    #[test]
    fn base_unit_is_a_noop() {
        let original = block(Some(20.0), Some(1500.0), "Hz");
        assert_eq!(normalize_quantitative(&original), original);
        let converted = normalize_quantitative(&block(Some(400.0), None, "nm"));
        assert_eq!(converted, block(Some(400.0), None, "nm"));
    }

    #[test]
    fn conversion_is_idempotent() {
        let once = normalize_quantitative(&block(Some(1.5), Some(3.0), "MHz"));
        let twice = normalize_quantitative(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_unit_passes_through() {
        let original = QuantitativeData {
            min: Some(1.0),
            max: None,
            unit: None,
            context: None,
        };
        assert_eq!(normalize_quantitative(&original), original);
    }

    #[rstest]
    #[case(2.0, "GHz", 2e9, "Hz")]
    #[case(3.0, "mm", 3e6, "nm")]
    #[case(1.0, "cm", 1e7, "nm")]
    #[case(2.0, "m", 2e9, "nm")]
    #[case(5.0, "µm", 5000.0, "nm")]
    #[case(5.0, "um", 5000.0, "nm")]
    #[case(7.0, " kHz ", 7000.0, "Hz")]
    #[case(9.0, "uV/cm", 9.0, "uV/cm")]
    #[case(9.0, "KHZ", 9.0, "KHZ")]
    fn table_conversions(
        #[case] value: f64,
        #[case] unit: &str,
        #[case] expected: f64,
        #[case] expected_unit: &str,
    ) {
        let (converted, base) = to_base_unit(value, unit);
        assert!((converted - expected).abs() < 1e-6);
        assert_eq!(base, expected_unit);
    }
}
