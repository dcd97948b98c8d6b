use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::error::LoadError;
use super::model::{LaunchDataset, LaunchRecord, Outcome};

pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

const REQUIRED_COLUMNS: [&str; 4] = [COL_SITE, COL_PAYLOAD, COL_CLASS, COL_BOOSTER_CATEGORY];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the launch columns; extra columns (such as
///   the unnamed index column pandas writes) are ignored
/// * `.json`    – `[{ "Launch Site": "...", "class": 1, ... }, ...]`
/// * `.parquet` – same column names, numeric or string typed
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    let dataset = LaunchDataset::from_records(records)
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON readers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawLaunch {
    #[serde(rename = "Flight Number", default)]
    flight_number: Option<u32>,
    #[serde(rename = "Launch Site")]
    site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    class: f64,
    #[serde(rename = "Booster Version", default)]
    booster_version: Option<String>,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
}

impl RawLaunch {
    fn into_record(self, row: usize) -> Result<LaunchRecord, LoadError> {
        Ok(LaunchRecord {
            flight_number: self.flight_number,
            site: self.site,
            payload_mass_kg: self.payload_mass_kg,
            outcome: outcome_from_flag(self.class, row)?,
            booster_version: self.booster_version.filter(|v| !v.is_empty()),
            booster_category: self.booster_category,
        })
    }
}

fn outcome_from_flag(flag: f64, row: usize) -> Result<Outcome, LoadError> {
    let invalid = || LoadError::InvalidOutcome {
        row,
        value: flag.to_string(),
    };
    if flag.fract() != 0.0 {
        return Err(invalid());
    }
    Outcome::from_class(flag as i64).ok_or_else(invalid)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column).into());
        }
    }

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<RawLaunch>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row}"))?;
        records.push(raw.into_record(row)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON {}", path.display()))?;
    let rows: Vec<RawLaunch> = serde_json::from_str(&text).context("parsing JSON launch records")?;

    rows.into_iter()
        .enumerate()
        .map(|(row, raw)| raw.into_record(row).map_err(anyhow::Error::from))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load launches from a Parquet file written by pandas, Polars or
/// `generate_sample`. Columns are cast to Float64 / Utf8 so either numeric
/// or string encodings are accepted.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        records.extend(batch_records(&batch, offset)?);
    }
    Ok(records)
}

fn batch_records(batch: &RecordBatch, offset: usize) -> Result<Vec<LaunchRecord>> {
    let sites = required_strings(batch, COL_SITE)?;
    let payloads = required_numbers(batch, COL_PAYLOAD)?;
    let classes = required_numbers(batch, COL_CLASS)?;
    let categories = required_strings(batch, COL_BOOSTER_CATEGORY)?;
    let flights = optional_column(batch, COL_FLIGHT_NUMBER, DataType::Float64)?;
    let versions = optional_column(batch, COL_BOOSTER_VERSION, DataType::Utf8)?;

    let flights = flights
        .as_ref()
        .and_then(|a| a.as_any().downcast_ref::<Float64Array>());
    let versions = versions
        .as_ref()
        .and_then(|a| a.as_any().downcast_ref::<StringArray>());

    let mut out = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let row = offset + i;
        let null_column = [
            (COL_SITE, sites.is_null(i)),
            (COL_PAYLOAD, payloads.is_null(i)),
            (COL_CLASS, classes.is_null(i)),
            (COL_BOOSTER_CATEGORY, categories.is_null(i)),
        ]
        .into_iter()
        .find_map(|(column, is_null)| is_null.then_some(column));
        if let Some(column) = null_column {
            return Err(LoadError::InvalidValue { row, column }.into());
        }

        out.push(LaunchRecord {
            flight_number: flights
                .filter(|a| !a.is_null(i))
                .map(|a| a.value(i))
                .filter(|v| *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as u32),
            site: sites.value(i).to_string(),
            payload_mass_kg: payloads.value(i),
            outcome: outcome_from_flag(classes.value(i), row)?,
            booster_version: versions
                .filter(|a| !a.is_null(i))
                .map(|a| a.value(i).to_string())
                .filter(|v| !v.is_empty()),
            booster_category: categories.value(i).to_string(),
        });
    }
    Ok(out)
}

// -- Arrow helpers --

fn optional_column(batch: &RecordBatch, name: &str, to: DataType) -> Result<Option<ArrayRef>> {
    match batch.schema().index_of(name) {
        Ok(idx) => {
            let casted = cast(batch.column(idx), &to)
                .with_context(|| format!("casting column '{name}' to {to:?}"))?;
            Ok(Some(casted))
        }
        Err(_) => Ok(None),
    }
}

fn required_column(batch: &RecordBatch, name: &'static str, to: DataType) -> Result<ArrayRef> {
    optional_column(batch, name, to)?.ok_or_else(|| LoadError::MissingColumn(name).into())
}

fn required_strings(batch: &RecordBatch, name: &'static str) -> Result<StringArray> {
    let array = required_column(batch, name, DataType::Utf8)?;
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .with_context(|| format!("column '{name}' is not a string column"))
}

fn required_numbers(batch: &RecordBatch, name: &'static str) -> Result<Float64Array> {
    let array = required_column(batch, name, DataType::Float64)?;
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .with_context(|| format!("column '{name}' is not numeric"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_or_out_of_range_flags_are_rejected() {
        assert_eq!(outcome_from_flag(1.0, 0).unwrap(), Outcome::Success);
        assert_eq!(outcome_from_flag(0.0, 0).unwrap(), Outcome::Failure);
        assert!(matches!(
            outcome_from_flag(0.5, 3),
            Err(LoadError::InvalidOutcome { row: 3, .. })
        ));
        assert!(outcome_from_flag(2.0, 0).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("launches.xlsx")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_file(Path::new("/nonexistent/spacex_launch_dash.csv")).is_err());
    }
}
