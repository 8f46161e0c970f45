use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::{LoadError, LoadResult};
use super::model::*;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a shopping-trends dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited text with a header row
/// * `.tsv`          – tab-delimited text with a header row
/// * `.json`         – `[{ "Age": 55, "Category": "Clothing", ... }, ...]`
/// * `.parquet`      – one column per required header
///
/// Columns beyond [`REQUIRED_COLUMNS`] are ignored.
pub fn load_file(path: &Path) -> LoadResult<ShoppingDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    log::debug!("parsed {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Write records as comma-delimited text using the source header names.
pub fn save_csv<'a>(path: &Path, records: impl IntoIterator<Item = &'a Record>) -> LoadResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for rec in records {
        writer.serialize(rec)?;
    }
    writer.flush()?;
    Ok(())
}

fn invalid(row: usize, column: &str, message: impl Into<String>) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: column.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row is checked against [`REQUIRED_COLUMNS`] before any row is
/// parsed, so a missing column never surfaces as a row error.
fn load_delimited(path: &Path, delimiter: u8) -> LoadResult<ShoppingDataset> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(BufReader::new(file));
    let headers = reader.headers()?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::missing(column));
        }
    }

    let mut records = Vec::new();
    for result in reader.deserialize::<Record>() {
        records.push(result.map_err(|e| csv_row_error(e, &headers))?);
    }

    Ok(ShoppingDataset::from_records(records))
}

/// Turn a serde failure into an [`LoadError::InvalidValue`] naming the column.
fn csv_row_error(err: csv::Error, headers: &csv::StringRecord) -> LoadError {
    if let csv::ErrorKind::Deserialize { pos, err: de } = err.kind() {
        // Record 0 is the header, so this is already a 1-based data row.
        let row = pos.as_ref().map_or(0, |p| p.record() as usize);
        let column = de
            .field()
            .and_then(|i| headers.get(i as usize))
            .unwrap_or("?");
        return invalid(row, column, de.kind().to_string());
    }
    LoadError::Csv(err)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, pandas `to_json(orient='records')`):
///
/// ```json
/// [
///   { "Age": 55, "Category": "Clothing", "Review Rating": 3.1, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> LoadResult<ShoppingDataset> {
    let file = File::open(path)?;
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_reader(BufReader::new(file))?;

    let records = rows
        .iter()
        .enumerate()
        .map(|(i, obj)| json_record(obj, i + 1))
        .collect::<LoadResult<Vec<_>>>()?;

    Ok(ShoppingDataset::from_records(records))
}

fn json_record(obj: &Map<String, JsonValue>, row: usize) -> LoadResult<Record> {
    Ok(Record {
        age: json_int(obj, COL_AGE, row)?,
        category: json_text(obj, COL_CATEGORY, row)?,
        review_rating: json_float(obj, COL_REVIEW_RATING, row)?,
        previous_purchases: json_int(obj, COL_PREVIOUS_PURCHASES, row)?,
        season: json_text(obj, COL_SEASON, row)?,
        payment_method: json_text(obj, COL_PAYMENT_METHOD, row)?,
        preferred_payment_method: json_text(obj, COL_PREFERRED_PAYMENT_METHOD, row)?,
        subscription_status: json_flag(obj, COL_SUBSCRIPTION_STATUS, row)?,
        discount_applied: json_flag(obj, COL_DISCOUNT_APPLIED, row)?,
        purchase_amount: json_float(obj, COL_PURCHASE_AMOUNT, row)?,
        location: json_text(obj, COL_LOCATION, row)?,
    })
}

fn json_field<'a>(obj: &'a Map<String, JsonValue>, column: &str) -> LoadResult<&'a JsonValue> {
    obj.get(column).ok_or_else(|| LoadError::missing(column))
}

fn json_int(obj: &Map<String, JsonValue>, column: &str, row: usize) -> LoadResult<i64> {
    let v = json_field(obj, column)?;
    v.as_i64()
        .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| invalid(row, column, format!("expected integer, got {v}")))
}

fn json_float(obj: &Map<String, JsonValue>, column: &str, row: usize) -> LoadResult<f64> {
    let v = json_field(obj, column)?;
    v.as_f64()
        .ok_or_else(|| invalid(row, column, format!("expected number, got {v}")))
}

fn json_text(obj: &Map<String, JsonValue>, column: &str, row: usize) -> LoadResult<String> {
    match json_field(obj, column)? {
        JsonValue::String(s) => Ok(s.clone()),
        other => Err(invalid(row, column, format!("expected text, got {other}"))),
    }
}

fn json_flag(obj: &Map<String, JsonValue>, column: &str, row: usize) -> LoadResult<YesNo> {
    let v = json_field(obj, column)?;
    v.as_str()
        .and_then(YesNo::parse)
        .ok_or_else(|| invalid(row, column, format!("expected \"Yes\" or \"No\", got {v}")))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Arrow type each required column is cast to, in [`REQUIRED_COLUMNS`] order.
const PARQUET_TYPES: [DataType; 11] = [
    DataType::Int64,   // Age
    DataType::Utf8,    // Category
    DataType::Float64, // Review Rating
    DataType::Int64,   // Previous Purchases
    DataType::Utf8,    // Season
    DataType::Utf8,    // Payment Method
    DataType::Utf8,    // Preferred Payment Method
    DataType::Utf8,    // Subscription Status
    DataType::Utf8,    // Discount Applied
    DataType::Float64, // Purchase Amount (USD)
    DataType::Utf8,    // Location
];

/// Load a Parquet file holding one column per required header.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); Int32 / Float32 / dictionary columns
/// are normalised through Arrow's cast kernel. Floating-point integer
/// columns are accepted only when every value is a whole number.
fn load_parquet(path: &Path) -> LoadResult<ShoppingDataset> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let columns = cast_required_columns(&batch)?;
        for row in 0..batch.num_rows() {
            let line = records.len() + 1;
            records.push(parquet_record(&columns, row, line)?);
        }
    }

    Ok(ShoppingDataset::from_records(records))
}

fn cast_required_columns(batch: &RecordBatch) -> LoadResult<Vec<ArrayRef>> {
    let schema = batch.schema();
    REQUIRED_COLUMNS
        .iter()
        .zip(PARQUET_TYPES.iter())
        .map(|(name, ty)| -> LoadResult<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::missing(name))?;
            let source = batch.column(idx);
            // Casting float to int truncates; keep floats and check per row.
            let target = if *ty == DataType::Int64 && source.data_type().is_floating() {
                &DataType::Float64
            } else {
                ty
            };
            Ok(cast(source, target)?)
        })
        .collect()
}

fn parquet_record(columns: &[ArrayRef], row: usize, line: usize) -> LoadResult<Record> {
    let int = |i: usize| -> LoadResult<i64> {
        let column = &columns[i];
        if column.is_null(row) {
            return Err(invalid(line, REQUIRED_COLUMNS[i], "null or non-integer value"));
        }
        if *column.data_type() != DataType::Float64 {
            return Ok(column.as_primitive::<Int64Type>().value(row));
        }
        let v = column.as_primitive::<Float64Type>().value(row);
        if v.fract() != 0.0 || v < i64::MIN as f64 || v > i64::MAX as f64 {
            let message = format!("expected a whole number, got {v}");
            return Err(invalid(line, REQUIRED_COLUMNS[i], message));
        }
        Ok(v as i64)
    };
    let float = |i: usize| -> LoadResult<f64> {
        let arr = columns[i].as_primitive::<Float64Type>();
        if arr.is_null(row) {
            return Err(invalid(line, REQUIRED_COLUMNS[i], "null or non-numeric value"));
        }
        Ok(arr.value(row))
    };
    let text = |i: usize| -> LoadResult<String> {
        let arr = columns[i].as_string::<i32>();
        if arr.is_null(row) {
            return Err(invalid(line, REQUIRED_COLUMNS[i], "null value"));
        }
        Ok(arr.value(row).to_string())
    };
    let flag = |i: usize| -> LoadResult<YesNo> {
        let s = text(i)?;
        YesNo::parse(&s).ok_or_else(|| {
            invalid(line, REQUIRED_COLUMNS[i], format!("expected \"Yes\" or \"No\", got '{s}'"))
        })
    };

    Ok(Record {
        age: int(0)?,
        category: text(1)?,
        review_rating: float(2)?,
        previous_purchases: int(3)?,
        season: text(4)?,
        payment_method: text(5)?,
        preferred_payment_method: text(6)?,
        subscription_status: flag(7)?,
        discount_applied: flag(8)?,
        purchase_amount: float(9)?,
        location: text(10)?,
    })
}
