use crate::color::ColorMap;
use crate::data::model::{Measurement, seed_measurements, unique_labels};
use crate::stats::{
    self, ComparisonRow, IntervalRow, StatsError, build_intervals, compare_to_reference,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Editable measurement rows.
    pub rows: Vec<Measurement>,

    /// Label of the row the comparison plot differences against.
    pub reference: String,

    /// Confidence interval multiplier, used by both plots.
    pub z: f64,

    /// Cached interval rows for the primary plot (recomputed on edit).
    pub intervals: Result<Vec<IntervalRow>, StatsError>,

    /// Cached comparison rows for the secondary plot and table.
    pub comparison: Result<Vec<ComparisonRow>, StatsError>,

    /// Label → colour, shared by both plots.
    pub color_map: ColorMap,

    /// Chart and axis titles (display-only).
    pub chart_title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let rows = seed_measurements();
        let reference = rows
            .first()
            .map(|m| m.label.clone())
            .unwrap_or_default();

        let mut state = Self {
            rows,
            reference,
            z: stats::DEFAULT_Z,
            intervals: Ok(Vec::new()),
            comparison: Ok(Vec::new()),
            color_map: ColorMap::default(),
            chart_title: "Result comparison".to_string(),
            x_axis_title: "Estimate".to_string(),
            y_axis_title: "Result".to_string(),
            status_message: None,
        };
        state.recompute();
        state
    }
}

impl AppState {
    /// Re-run both transforms against the current rows.
    ///
    /// This is the single recompute-on-change handler: every edit (cell
    /// change, row add/remove, reference reselection, multiplier change,
    /// file load) funnels through here, and the previous results are simply
    /// overwritten.
    pub fn recompute(&mut self) {
        self.color_map = ColorMap::new(self.rows.iter().map(|m| m.label.as_str()));

        self.intervals = build_intervals(&self.rows, self.z);
        if let Err(e) = &self.intervals {
            log::warn!("interval computation rejected input: {e}");
        }

        self.comparison = compare_to_reference(&self.rows, &self.reference, self.z);
        if let Err(e) = &self.comparison {
            log::warn!("comparison computation rejected input: {e}");
        }
    }

    /// Ingest a newly loaded dataset, keeping the reference if its label
    /// survived the load.
    pub fn set_rows(&mut self, rows: Vec<Measurement>) {
        let labels = unique_labels(&rows);
        if !labels.iter().any(|l| *l == self.reference) {
            self.reference = labels.first().cloned().unwrap_or_default();
        }
        self.rows = rows;
        self.status_message = None;
        self.recompute();
    }

    /// Append a blank row after the current ones.
    pub fn add_row(&mut self) {
        let label = format!("Test {}", self.rows.len());
        self.rows.push(Measurement::new(label, 0.0, 1.0));
        self.recompute();
    }

    /// Remove the row at `index` (ignored when out of range).
    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
            self.recompute();
        }
    }

    /// Select a new reference row by label.
    pub fn set_reference(&mut self, label: String) {
        self.reference = label;
        self.recompute();
    }

    /// Unique labels for the reference selector.
    pub fn labels(&self) -> Vec<String> {
        unique_labels(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_computes_both_outputs() {
        let state = AppState::default();
        assert_eq!(state.intervals.as_ref().unwrap().len(), 3);
        assert_eq!(state.comparison.as_ref().unwrap().len(), 2);
        assert_eq!(state.reference, "Reference");
    }

    #[test]
    fn deleting_the_reference_row_surfaces_the_error() {
        let mut state = AppState::default();
        state.remove_row(0);
        assert_eq!(state.intervals.as_ref().unwrap().len(), 2);
        assert_eq!(
            state.comparison,
            Err(StatsError::ReferenceNotFound("Reference".to_string()))
        );
    }

    #[test]
    fn loading_rows_without_the_old_reference_picks_the_first_label() {
        let mut state = AppState::default();
        state.set_rows(vec![
            Measurement::new("Control", 0.0, 1.0),
            Measurement::new("Drug A", 1.0, 0.5),
        ]);
        assert_eq!(state.reference, "Control");
        assert_eq!(state.comparison.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn negative_se_edit_is_rejected_not_clamped() {
        let mut state = AppState::default();
        state.rows[1].se = -1.0;
        state.recompute();
        assert!(matches!(state.intervals, Err(StatsError::InvalidInput(_))));
        assert!(matches!(state.comparison, Err(StatsError::InvalidInput(_))));
    }
}
