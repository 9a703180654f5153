use std::path::Path;

use anyhow::{Context, Result};

use crate::stats::ComparisonRow;

// ---------------------------------------------------------------------------
// CSV export of the comparison table
// ---------------------------------------------------------------------------

/// Write the comparison table as CSV, with the same columns as the on-screen
/// table.
pub fn write_comparison_csv(path: &Path, rows: &[ComparisonRow]) -> Result<()> {
    let writer = csv::Writer::from_path(path).context("creating CSV file")?;
    write_comparison(writer, rows)
}

fn write_comparison<W: std::io::Write>(
    mut writer: csv::Writer<W>,
    rows: &[ComparisonRow],
) -> Result<()> {
    // The header comes from ComparisonRow's serde names.
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing CSV row for {:?}", row.label))?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let rows = vec![ComparisonRow {
            label: "Test 1".to_string(),
            diff: 4.0,
            diff_se: 1.5,
            low: 1.06,
            high: 6.94,
        }];

        let mut buf = Vec::new();
        write_comparison(csv::Writer::from_writer(&mut buf), &rows).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Label,diff,diff_SE,low_CI,high_CI"));
        assert_eq!(lines.next(), Some("Test 1,4.0,1.5,1.06,6.94"));
        assert_eq!(lines.next(), None);
    }
}
