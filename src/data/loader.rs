use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, BooleanArray, Int16Array, Int32Array, Int64Array, Int8Array, UInt16Array,
    UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{RecordError, RentalDataset, RentalRecord};

/// Source columns the loader needs, in `RentalRecord::from_codes` order.
/// Any other column (`instant`, `dteday`, `cnt`, weather …) is ignored.
pub const REQUIRED_COLUMNS: [&str; 6] =
    ["season", "hr", "holiday", "workingday", "casual", "registered"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a rental dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the `hour.csv` layout, integer-coded cells (recommended)
/// * `.json`    – `[{ "season": 1, "hr": 0, "holiday": 0, ... }, ...]`
/// * `.parquet` – integer or boolean columns with the same names
///
/// Any malformed row aborts the whole load.
pub fn load_file(path: &Path) -> Result<RentalDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rental records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one hourly observation per row.
/// Flags are `0`/`1` (`true`/`false` also accepted).
pub fn load_csv(path: &Path) -> Result<RentalDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Parse CSV from any reader (used directly by tests and stdin callers).
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<RentalDataset> {
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let mut idx = [0usize; 6];
    for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(RecordError::MissingColumn(name))
            .context("CSV header")?;
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut codes = [0i64; 6];
        for ((code, &col), name) in codes.iter_mut().zip(&idx).zip(REQUIRED_COLUMNS) {
            let cell = row.get(col).unwrap_or("");
            *code = parse_code(cell)
                .with_context(|| format!("CSV row {row_no}, column '{name}': '{cell}'"))?;
        }
        records.push(record_from_codes(codes).with_context(|| format!("CSV row {row_no}"))?);
    }

    Ok(RentalDataset::from_records(records))
}

/// Integer cell, or a `true`/`false` flag.
fn parse_code(s: &str) -> Result<i64> {
    let s = s.trim();
    match s {
        "true" | "True" | "TRUE" => return Ok(1),
        "false" | "False" | "FALSE" => return Ok(0),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    // Some exports write integer columns as `3.0`.
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
        _ => bail!("not an integer"),
    }
}

fn record_from_codes(c: [i64; 6]) -> std::result::Result<RentalRecord, RecordError> {
    RentalRecord::from_codes(c[0], c[1], c[2], c[3], c[4], c[5])
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "season": 1, "hr": 0, "holiday": 0, "workingday": 0, "casual": 3, "registered": 13 },
///   ...
/// ]
/// ```
pub fn load_json(path: &Path) -> Result<RentalDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<RentalDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut codes = [0i64; 6];
        for (code, name) in codes.iter_mut().zip(REQUIRED_COLUMNS) {
            let val = obj
                .get(name)
                .ok_or(RecordError::MissingColumn(name))
                .with_context(|| format!("Row {i}"))?;
            *code = json_code(val).with_context(|| format!("Row {i}, '{name}': {val}"))?;
        }
        records.push(record_from_codes(codes).with_context(|| format!("Row {i}"))?);
    }

    Ok(RentalDataset::from_records(records))
}

fn json_code(val: &JsonValue) -> Result<i64> {
    match val {
        JsonValue::Bool(b) => Ok(*b as i64),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 => Ok(f as i64),
                    _ => bail!("not an integer"),
                }
            }
        }
        JsonValue::String(s) => parse_code(s),
        _ => bail!("not an integer"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the `hour.csv` columns.
///
/// Integer columns may be any signed or unsigned width; flags may also be
/// stored as Boolean. Works with files written by Pandas and Polars, and by
/// the `generate-sample` binary.
pub fn load_parquet(path: &Path) -> Result<RentalDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut cols = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| RecordError::MissingColumn(name))
                .context("Parquet schema")?;
            cols.push((name, batch.column(idx)));
        }

        for row in 0..batch.num_rows() {
            let row_no = row_base + row;
            let mut codes = [0i64; 6];
            for (code, (name, col)) in codes.iter_mut().zip(&cols) {
                *code = extract_code(col, row)
                    .with_context(|| format!("Row {row_no}: failed to read '{name}'"))?;
            }
            records.push(record_from_codes(codes).with_context(|| format!("Row {row_no}"))?);
        }
        row_base += batch.num_rows();
    }

    Ok(RentalDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("column does not match its {:?} type", col.data_type()))
}

/// Extract an integer-coded cell from an Arrow column at the given row.
fn extract_code(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let v = match col.data_type() {
        DataType::Boolean => downcast::<BooleanArray>(col)?.value(row) as i64,
        DataType::Int8 => downcast::<Int8Array>(col)?.value(row) as i64,
        DataType::Int16 => downcast::<Int16Array>(col)?.value(row) as i64,
        DataType::Int32 => downcast::<Int32Array>(col)?.value(row) as i64,
        DataType::Int64 => downcast::<Int64Array>(col)?.value(row),
        DataType::UInt8 => downcast::<UInt8Array>(col)?.value(row) as i64,
        DataType::UInt16 => downcast::<UInt16Array>(col)?.value(row) as i64,
        DataType::UInt32 => downcast::<UInt32Array>(col)?.value(row) as i64,
        DataType::UInt64 => {
            let v = downcast::<UInt64Array>(col)?.value(row);
            i64::try_from(v).context("value overflows i64")?
        }
        other => bail!("Expected an integer or boolean column, got {other:?}"),
    };
    Ok(v)
}
