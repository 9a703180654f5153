use serde::{Deserialize, Serialize};

use super::interval::confidence_interval;
use super::{StatsError, validate_multiplier, validate_rows};
use crate::data::model::Measurement;

// ---------------------------------------------------------------------------
// ComparisonRow – one row of the comparison-to-reference plot and table
// ---------------------------------------------------------------------------

/// Difference of a measurement from the reference, with propagated
/// uncertainty and confidence interval bounds.
///
/// The serde names match the exported CSV columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    #[serde(rename = "Label")]
    pub label: String,
    /// `estimate - reference_estimate`.
    #[serde(rename = "diff")]
    pub diff: f64,
    /// Propagated standard error of the difference, `sqrt(se² + ref_se²)`.
    #[serde(rename = "diff_SE")]
    pub diff_se: f64,
    #[serde(rename = "low_CI")]
    pub low: f64,
    #[serde(rename = "high_CI")]
    pub high: f64,
}

// ---------------------------------------------------------------------------
// Comparison transform
// ---------------------------------------------------------------------------

/// Compute each measurement's difference from the reference row.
///
/// The reference is the *first* row (in input order) whose label equals
/// `reference_label`; every row carrying that label is excluded from the
/// output, so duplicate labels behave deterministically. The remaining rows
/// keep their relative order.
///
/// The propagated SE treats the two estimates as independent, which is the
/// modeling assumption of this tool, not a general statistical fact.
///
/// Fails with [`StatsError::ReferenceNotFound`] when no row matches and
/// [`StatsError::InvalidInput`] when any row carries a negative or
/// non-finite field.
pub fn compare_to_reference(
    rows: &[Measurement],
    reference_label: &str,
    z: f64,
) -> Result<Vec<ComparisonRow>, StatsError> {
    validate_rows(rows)?;
    validate_multiplier(z)?;

    let reference = rows
        .iter()
        .find(|m| m.label == reference_label)
        .ok_or_else(|| StatsError::ReferenceNotFound(reference_label.to_string()))?;
    let (ref_estimate, ref_se) = (reference.estimate, reference.se);

    rows.iter()
        .filter(|m| m.label != reference_label)
        .map(|m| {
            let diff = m.estimate - ref_estimate;
            let diff_se = (m.se * m.se + ref_se * ref_se).sqrt();
            let (low, high) = confidence_interval(diff, diff_se, z)?;
            Ok(ComparisonRow {
                label: m.label.clone(),
                diff,
                diff_se,
                low,
                high,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::seed_measurements;
    use crate::stats::DEFAULT_Z;

    fn rows() -> Vec<Measurement> {
        seed_measurements()
    }

    #[test]
    fn reference_row_is_excluded() {
        let out = compare_to_reference(&rows(), "Reference", DEFAULT_Z).unwrap();
        assert_eq!(out.len(), rows().len() - 1);
        assert!(out.iter().all(|r| r.label != "Reference"));
    }

    #[test]
    fn relative_order_is_preserved() {
        let out = compare_to_reference(&rows(), "Test 1", DEFAULT_Z).unwrap();
        let labels: Vec<&str> = out.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Reference", "Test 2"]);
    }

    #[test]
    fn missing_reference_is_reported() {
        let err = compare_to_reference(&rows(), "Nonexistent", DEFAULT_Z).unwrap_err();
        assert_eq!(err, StatsError::ReferenceNotFound("Nonexistent".to_string()));
    }

    #[test]
    fn error_propagation_three_four_five() {
        let rows = vec![
            Measurement::new("Control", 0.0, 3.0),
            Measurement::new("Treatment", 1.0, 4.0),
        ];
        let out = compare_to_reference(&rows, "Control", DEFAULT_Z).unwrap();
        assert!((out[0].diff_se - 5.0).abs() < 1e-12);
    }

    #[test]
    fn zero_se_on_both_sides_collapses_the_interval() {
        let rows = vec![
            Measurement::new("Control", 1.0, 0.0),
            Measurement::new("Treatment", 4.0, 0.0),
        ];
        let out = compare_to_reference(&rows, "Control", DEFAULT_Z).unwrap();
        assert_eq!(out[0].diff_se, 0.0);
        assert_eq!(out[0].low, out[0].diff);
        assert_eq!(out[0].high, out[0].diff);
        assert_eq!(out[0].diff, 3.0);
    }

    #[test]
    fn duplicate_reference_labels_use_first_match_and_exclude_all() {
        let rows = vec![
            Measurement::new("Control", 10.0, 1.0),
            Measurement::new("Treatment", 14.0, 1.0),
            Measurement::new("Control", 99.0, 9.0),
        ];
        let out = compare_to_reference(&rows, "Control", DEFAULT_Z).unwrap();
        // Differenced against the first "Control", not the second.
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "Treatment");
        assert!((out[0].diff - 4.0).abs() < 1e-12);
        assert!((out[0].diff_se - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn negative_se_anywhere_is_rejected() {
        let rows = vec![
            Measurement::new("Control", 0.0, 1.0),
            Measurement::new("Treatment", 1.0, -1.0),
        ];
        let err = compare_to_reference(&rows, "Control", DEFAULT_Z).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
    }

    #[test]
    fn seed_dataset_end_to_end() {
        let out = compare_to_reference(&rows(), "Reference", 1.96).unwrap();
        assert_eq!(out.len(), 2);

        let sqrt2 = 2.0_f64.sqrt();

        assert_eq!(out[0].label, "Test 1");
        assert!((out[0].diff - 4.0).abs() < 1e-12);
        assert!((out[0].diff_se - sqrt2).abs() < 1e-12);
        assert!((out[0].low - (4.0 - 1.96 * sqrt2)).abs() < 1e-12);
        assert!((out[0].high - (4.0 + 1.96 * sqrt2)).abs() < 1e-12);
        assert!((out[0].low - 1.228).abs() < 1e-3);
        assert!((out[0].high - 6.772).abs() < 1e-3);

        assert_eq!(out[1].label, "Test 2");
        assert!((out[1].diff - 2.0).abs() < 1e-12);
        assert!((out[1].low - (-0.772)).abs() < 1e-3);
        assert!((out[1].high - 4.772).abs() < 1e-3);
    }

    #[test]
    fn output_owns_its_data() {
        let input = rows();
        let out = compare_to_reference(&input, "Reference", DEFAULT_Z).unwrap();
        drop(input);
        assert_eq!(out[0].label, "Test 1");
    }
}
