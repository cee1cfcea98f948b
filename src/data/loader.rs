use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    CellValue, City, Trip, TripDataset, BIRTH_YEAR, GENDER, REQUIRED_COLUMNS,
};

/// Extensions tried, in order, when looking for a city's dataset.
const EXTENSIONS: [&str; 3] = ["csv", "parquet", "json"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Find the dataset file for `city` inside `data_dir`.
pub fn locate(data_dir: &Path, city: City) -> Result<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| data_dir.join(format!("{}.{ext}", city.file_stem())))
        .find(|path| path.is_file())
        .with_context(|| {
            format!(
                "no dataset for {city} in {} (expected {}.csv, .parquet or .json)",
                data_dir.display(),
                city.file_stem()
            )
        })
}

/// Locate and load the dataset for `city`.
pub fn load_city(data_dir: &Path, city: City) -> Result<TripDataset> {
    let path = locate(data_dir, city)?;
    load_file(&path, city)
}

/// Load a trip dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the usual bikeshare column names (primary)
/// * `.json`    – `[{ "Start Time": "...", "Trip Duration": 321, ... }, ...]`
/// * `.parquet` – same columns; `Start Time` may be text or a timestamp
pub fn load_file(path: &Path, city: City) -> Result<TripDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path, city),
        "json" => load_json(path, city),
        "parquet" | "pq" => load_parquet(path, city),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} trips for {} from {}",
        dataset.len(),
        city,
        path.display()
    );
    Ok(dataset)
}

/// Fail unless every required column is present; warn about missing
/// demographic columns for cities that should have them.
fn check_columns<'a>(city: City, columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let present: BTreeSet<&str> = columns.into_iter().collect();
    for required in REQUIRED_COLUMNS {
        if !present.contains(required) {
            bail!("missing required column '{required}'");
        }
    }
    if city.has_demographics() {
        for optional in [GENDER, BIRTH_YEAR] {
            if !present.contains(optional) {
                log::warn!("{city} dataset has no '{optional}' column; skipping it");
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. A leading unnamed column (the
/// index pandas writes) is ignored.
fn load_csv(path: &Path, city: City) -> Result<TripDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_columns(city, headers.iter().map(String::as_str))?;

    let mut trips = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let cells: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.clone(), guess_cell_type(value)))
            .collect();

        let trip = Trip::from_cells(&cells).with_context(|| format!("CSV row {row_no}"))?;
        trips.push(trip);
    }

    Ok(TripDataset::new(
        city,
        trips,
        headers.iter().map(String::as_str),
    ))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Start Time": "2017-06-23 15:09:32",
///     "Trip Duration": 321,
///     "Start Station": "Wood St & Hubbard St",
///     "End Station": "Damen Ave & Chicago Ave",
///     "User Type": "Subscriber"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path, city: City) -> Result<TripDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: BTreeSet<String> = BTreeSet::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let cells: BTreeMap<String, CellValue> = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_cell(val)))
            .collect();
        columns.extend(cells.keys().cloned());
        rows.push(cells);
    }
    check_columns(city, columns.iter().map(String::as_str))?;

    let trips = rows
        .iter()
        .enumerate()
        .map(|(i, cells)| Trip::from_cells(cells).with_context(|| format!("Row {i}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(TripDataset::new(city, trips, columns.iter().map(String::as_str)))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of trips.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); timestamps may be stored natively at
/// any resolution or as text.
fn load_parquet(path: &Path, city: City) -> Result<TripDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_columns(city, columns.iter().map(String::as_str))?;

    let reader = builder.build().context("building parquet reader")?;
    let mut trips = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let cells: BTreeMap<String, CellValue> = schema
                .fields()
                .iter()
                .zip(batch.columns())
                .map(|(field, col)| (field.name().clone(), extract_cell(col, row)))
                .collect();
            let trip = Trip::from_cells(&cells)
                .with_context(|| format!("Row {}", trips.len()))?;
            trips.push(trip);
        }
    }

    Ok(TripDataset::new(city, trips, columns.iter().map(String::as_str)))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let timestamp = |ts: Option<chrono::NaiveDateTime>| ts.map_or(CellValue::Null, CellValue::Timestamp);
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Timestamp(TimeUnit::Second, _) => {
            timestamp(col.as_primitive::<TimestampSecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            timestamp(col.as_primitive::<TimestampMillisecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            timestamp(col.as_primitive::<TimestampMicrosecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            timestamp(col.as_primitive::<TimestampNanosecondType>().value_as_datetime(row))
        }
        other => {
            log::debug!("unsupported parquet column type {other:?}; treating as null");
            CellValue::Null
        }
    }
}
