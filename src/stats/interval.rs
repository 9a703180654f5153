use serde::{Deserialize, Serialize};

use super::{StatsError, validate_multiplier, validate_rows};
use crate::data::model::Measurement;

// ---------------------------------------------------------------------------
// Confidence interval primitive
// ---------------------------------------------------------------------------

/// Symmetric normal-approximation confidence interval around an estimate:
/// `(estimate - z·se, estimate + z·se)`.
///
/// Fails fast with [`StatsError::InvalidInput`] on a negative or non-finite
/// `se`, a negative or non-finite `z`, or a non-finite `estimate` — an
/// inverted interval is never returned.
pub fn confidence_interval(estimate: f64, se: f64, z: f64) -> Result<(f64, f64), StatsError> {
    if !estimate.is_finite() {
        return Err(StatsError::InvalidInput(format!(
            "estimate {estimate} is not finite"
        )));
    }
    if !se.is_finite() || se < 0.0 {
        return Err(StatsError::InvalidInput(format!(
            "standard error {se} must be finite and >= 0"
        )));
    }
    validate_multiplier(z)?;

    let half_width = z * se;
    Ok((estimate - half_width, estimate + half_width))
}

// ---------------------------------------------------------------------------
// IntervalRow – one row of the primary forest plot
// ---------------------------------------------------------------------------

/// A measurement with its confidence interval bounds attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRow {
    pub label: String,
    pub estimate: f64,
    pub se: f64,
    /// Lower interval bound, `estimate - z·se`.
    pub low: f64,
    /// Upper interval bound, `estimate + z·se`.
    pub high: f64,
}

/// Attach a confidence interval to every measurement.
///
/// Emits exactly one [`IntervalRow`] per input row, in input order; an empty
/// input yields an empty output. Fails with [`StatsError::InvalidInput`] if
/// any row carries a negative or non-finite field.
pub fn build_intervals(rows: &[Measurement], z: f64) -> Result<Vec<IntervalRow>, StatsError> {
    validate_rows(rows)?;
    validate_multiplier(z)?;

    rows.iter()
        .map(|m| {
            let (low, high) = confidence_interval(m.estimate, m.se, z)?;
            Ok(IntervalRow {
                label: m.label.clone(),
                estimate: m.estimate,
                se: m.se,
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

    #[test]
    fn interval_is_symmetric_around_estimate() {
        let (low, high) = confidence_interval(3.0, 0.5, 2.0).unwrap();
        assert!((3.0 - low - 1.0).abs() < 1e-12);
        assert!((high - 3.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_se_collapses_to_point() {
        let (low, high) = confidence_interval(7.25, 0.0, DEFAULT_Z).unwrap();
        assert_eq!(low, 7.25);
        assert_eq!(high, 7.25);
    }

    #[test]
    fn zero_multiplier_collapses_to_point() {
        let (low, high) = confidence_interval(-2.0, 10.0, 0.0).unwrap();
        assert_eq!(low, -2.0);
        assert_eq!(high, -2.0);
    }

    #[test]
    fn negative_se_is_rejected() {
        let err = confidence_interval(1.0, -0.1, DEFAULT_Z).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_estimate_is_rejected() {
        assert!(confidence_interval(f64::NAN, 1.0, DEFAULT_Z).is_err());
        assert!(confidence_interval(f64::INFINITY, 1.0, DEFAULT_Z).is_err());
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        let err = confidence_interval(1.0, 1.0, -1.96).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
    }

    #[test]
    fn one_output_row_per_input_row_in_order() {
        let rows = vec![
            Measurement::new("b", 1.0, 0.5),
            Measurement::new("a", 2.0, 0.5),
            Measurement::new("b", 3.0, 0.5),
        ];
        let out = build_intervals(&rows, DEFAULT_Z).unwrap();
        assert_eq!(out.len(), rows.len());
        let labels: Vec<&str> = out.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["b", "a", "b"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out = build_intervals(&[], DEFAULT_Z).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn any_negative_se_fails_the_whole_call() {
        let rows = vec![
            Measurement::new("ok", 1.0, 0.5),
            Measurement::new("bad", 2.0, -0.5),
        ];
        let err = build_intervals(&rows, DEFAULT_Z).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn seed_dataset_bounds() {
        let out = build_intervals(&seed_measurements(), 1.96).unwrap();
        let bounds: Vec<(f64, f64)> = out.iter().map(|r| (r.low, r.high)).collect();
        let expected = [(-1.96, 1.96), (2.04, 5.96), (0.04, 3.96)];
        for ((low, high), (e_low, e_high)) in bounds.iter().zip(expected) {
            assert!((low - e_low).abs() < 1e-12, "low {low} != {e_low}");
            assert!((high - e_high).abs() < 1e-12, "high {high} != {e_high}");
        }
    }
}
