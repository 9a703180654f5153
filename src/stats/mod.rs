/// Statistics layer: pure transforms from raw measurements to plot rows.
///
/// Architecture:
/// ```text
///   Vec<Measurement>
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌───────────┐        ┌────────────┐
///   │ interval   │        │  compare    │
///   │ est ± z·SE │        │ diff vs ref │
///   └───────────┘        └────────────┘
///        │                      │
///        ▼                      ▼
///   Vec<IntervalRow>      Vec<ComparisonRow>
/// ```
///
/// Both transforms are stateless and side-effect-free: each call reads its
/// input slice and returns a fresh output vector, so concurrent calls over
/// independent inputs need no synchronisation.
pub mod compare;
pub mod interval;

use thiserror::Error;

use crate::data::model::Measurement;

pub use compare::{ComparisonRow, compare_to_reference};
pub use interval::{IntervalRow, build_intervals, confidence_interval};

/// Multiplier for a 95% two-sided normal confidence interval.
pub const DEFAULT_Z: f64 = 1.96;

/// Errors reported by the statistics layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// A structural precondition was violated: negative standard error,
    /// non-finite value, or a multiplier outside `[0, ∞)`.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The selected reference label matches no row in the dataset.
    #[error("reference label {0:?} does not match any row")]
    ReferenceNotFound(String),
}

/// Check every row up front so bad input is rejected before any output is
/// produced. A negative SE is never clamped; it is the caller's bug.
pub(crate) fn validate_rows(rows: &[Measurement]) -> Result<(), StatsError> {
    for row in rows {
        if !row.estimate.is_finite() {
            return Err(StatsError::InvalidInput(format!(
                "row {:?}: estimate {} is not finite",
                row.label, row.estimate
            )));
        }
        if !row.se.is_finite() {
            return Err(StatsError::InvalidInput(format!(
                "row {:?}: standard error {} is not finite",
                row.label, row.se
            )));
        }
        if row.se < 0.0 {
            return Err(StatsError::InvalidInput(format!(
                "row {:?}: negative standard error {}",
                row.label, row.se
            )));
        }
    }
    Ok(())
}

pub(crate) fn validate_multiplier(z: f64) -> Result<(), StatsError> {
    if !z.is_finite() || z < 0.0 {
        return Err(StatsError::InvalidInput(format!(
            "multiplier {z} must be finite and >= 0"
        )));
    }
    Ok(())
}
