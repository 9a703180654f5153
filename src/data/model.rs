use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Measurement – one row of the data table
// ---------------------------------------------------------------------------

/// A single labelled estimate with its standard error.
///
/// Labels are not required to be unique; the statistics layer has a
/// deterministic policy for duplicates. `se` must be >= 0 — the statistics
/// layer rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Estimate")]
    pub estimate: f64,
    #[serde(rename = "SE")]
    pub se: f64,
}

impl Measurement {
    pub fn new(label: impl Into<String>, estimate: f64, se: f64) -> Self {
        Measurement {
            label: label.into(),
            estimate,
            se,
        }
    }
}

/// The dataset shown on startup: a reference at zero and two tests with
/// unit standard errors.
pub fn seed_measurements() -> Vec<Measurement> {
    vec![
        Measurement::new("Reference", 0.0, 1.0),
        Measurement::new("Test 1", 4.0, 1.0),
        Measurement::new("Test 2", 2.0, 1.0),
    ]
}

/// Unique labels in first-appearance order, for the reference selector.
pub fn unique_labels(rows: &[Measurement]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for row in rows {
        if !labels.iter().any(|l| *l == row.label) {
            labels.push(row.label.clone());
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_labels_keep_first_appearance_order() {
        let rows = vec![
            Measurement::new("b", 0.0, 1.0),
            Measurement::new("a", 0.0, 1.0),
            Measurement::new("b", 0.0, 1.0),
        ];
        assert_eq!(unique_labels(&rows), ["b", "a"]);
    }
}
