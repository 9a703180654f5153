use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Measurement;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – Parquet file with `Label`, `Estimate`, `SE` columns
/// * `.json`    – `[{ "Label": "...", "Estimate": 1.0, "SE": 0.5 }, ...]`
/// * `.csv`     – header row `Label,Estimate,SE`
///
/// Numeric cells are coerced to `f64` here, at the boundary; anything
/// non-numeric fails with a row/column-qualified error instead of leaking
/// into the statistics layer.
pub fn load_file(path: &Path) -> Result<Vec<Measurement>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Label": "Reference", "Estimate": 0.0, "SE": 1.0 },
///   { "Label": "Test 1",    "Estimate": 4.0, "SE": 1.0 }
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Measurement>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Vec<Measurement>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let label = obj
            .get("Label")
            .and_then(|v| v.as_str())
            .with_context(|| format!("Row {i}: missing 'Label' string"))?;
        let estimate = json_number(obj.get("Estimate"), i, "Estimate")?;
        let se = json_number(obj.get("SE"), i, "SE")?;

        rows.push(Measurement::new(label, estimate, se));
    }

    Ok(rows)
}

fn json_number(val: Option<&JsonValue>, row: usize, col: &str) -> Result<f64> {
    let val = val.with_context(|| format!("Row {row}: missing '{col}'"))?;
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .with_context(|| format!("Row {row}, {col}: {n} does not fit an f64")),
        // Spreadsheet exports sometimes quote numeric cells.
        JsonValue::String(s) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Row {row}, {col}: '{s}' is not a number")),
        other => bail!("Row {row}, {col}: expected a number, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row `Label,Estimate,SE` (any casing), one measurement
/// per record.
fn load_csv(path: &Path) -> Result<Vec<Measurement>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Measurement>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let label_idx = column("Label")?;
    let estimate_idx = column("Estimate")?;
    let se_idx = column("SE")?;

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let label = record.get(label_idx).unwrap_or("").trim();
        let estimate = parse_float(record.get(estimate_idx).unwrap_or(""), row_no, "Estimate")?;
        let se = parse_float(record.get(se_idx).unwrap_or(""), row_no, "SE")?;

        rows.push(Measurement::new(label, estimate, se));
    }

    Ok(rows)
}

fn parse_float(s: &str, row: usize, col: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing a measurement table.
///
/// Expected schema:
/// - `Label`: Utf8 or LargeUtf8
/// - `Estimate`, `SE`: Float64 / Float32 / Int64 / Int32 (coerced to f64)
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Measurement>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str| -> Result<usize> {
            schema
                .fields()
                .iter()
                .position(|f| f.name().eq_ignore_ascii_case(name))
                .with_context(|| format!("Parquet file missing '{name}' column"))
        };
        let label_col = batch.column(column("Label")?);
        let estimate_col = batch.column(column("Estimate")?);
        let se_col = batch.column(column("SE")?);

        for row in 0..batch.num_rows() {
            let label = extract_string(label_col, row)
                .with_context(|| format!("Row {row}: failed to read 'Label'"))?;
            let estimate = extract_f64(estimate_col, row)
                .with_context(|| format!("Row {row}: failed to read 'Estimate'"))?;
            let se = extract_f64(se_col, row)
                .with_context(|| format!("Row {row}: failed to read 'SE'"))?;

            rows.push(Measurement::new(label, estimate, se));
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Extract a string cell from an Arrow column at the given row.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null label");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            use arrow::array::AsArray;
            Ok(col.as_string::<i64>().value(row).to_string())
        }
        other => bail!("Expected a string column, got {other:?}"),
    }
}

/// Extract a numeric cell as `f64`, coercing the common numeric dtypes.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        other => bail!("Expected a numeric column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_round_trip() {
        let text = "Label,Estimate,SE\nReference,0.0,1.0\nTest 1,4.0,1.0\n";
        let reader = csv::Reader::from_reader(text.as_bytes());
        let rows = read_csv(reader).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Measurement::new("Reference", 0.0, 1.0));
        assert_eq!(rows[1], Measurement::new("Test 1", 4.0, 1.0));
    }

    #[test]
    fn csv_headers_match_any_casing() {
        let text = "label,estimate,se\nA,1.5,0.2\n";
        let reader = csv::Reader::from_reader(text.as_bytes());
        let rows = read_csv(reader).unwrap();
        assert_eq!(rows[0], Measurement::new("A", 1.5, 0.2));
    }

    #[test]
    fn csv_rejects_non_numeric_cells() {
        let text = "Label,Estimate,SE\nA,not-a-number,0.2\n";
        let reader = csv::Reader::from_reader(text.as_bytes());
        let err = read_csv(reader).unwrap_err();
        assert!(format!("{err:#}").contains("not-a-number"));
    }

    #[test]
    fn csv_rejects_missing_column() {
        let text = "Label,Estimate\nA,1.0\n";
        let reader = csv::Reader::from_reader(text.as_bytes());
        let err = read_csv(reader).unwrap_err();
        assert!(format!("{err:#}").contains("SE"));
    }

    #[test]
    fn json_records_parse_with_quoted_numbers() {
        let text = r#"[
            { "Label": "Reference", "Estimate": 0.0, "SE": 1.0 },
            { "Label": "Test 1", "Estimate": "4.0", "SE": "1.0" }
        ]"#;
        let rows = parse_json(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], Measurement::new("Test 1", 4.0, 1.0));
    }

    #[test]
    fn json_rejects_non_numeric_estimate() {
        let text = r#"[ { "Label": "A", "Estimate": true, "SE": 1.0 } ]"#;
        let err = parse_json(text).unwrap_err();
        assert!(format!("{err:#}").contains("Estimate"));
    }
}
