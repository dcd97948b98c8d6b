//! Write a synthetic launch table for trying the dashboard without the real
//! dataset. Output format follows the extension: `.csv` or `.parquet`.
//!
//! ```text
//! cargo run --bin generate_sample -- spacex_launch_dash.csv
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const FLIGHTS: u32 = 56;
const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

/// One output row, using the column names the dashboard expects.
#[derive(Debug, Serialize)]
struct SampleLaunch {
    #[serde(rename = "Flight Number")]
    flight_number: u32,
    #[serde(rename = "Launch Site")]
    site: &'static str,
    class: u8,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_category: &'static str,
}

/// splitmix64 – small, deterministic, good enough for sample data.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn booster_for(flight: u32) -> (&'static str, f64) {
    // Category and payload ceiling (kg) by programme era.
    match flight {
        0..=5 => ("v1.0", 700.0),
        6..=20 => ("v1.1", 4600.0),
        21..=40 => ("FT", 9600.0),
        41..=50 => ("B4", 9600.0),
        _ => ("B5", 15600.0),
    }
}

fn generate(seed: u64) -> Vec<SampleLaunch> {
    let mut rng = SplitMix(seed);
    (1..=FLIGHTS)
        .map(|flight| {
            let (category, ceiling) = booster_for(flight);
            // Early flights carry nothing; later ones round to 10 kg.
            let payload = if flight <= 2 {
                0.0
            } else {
                (rng.unit() * ceiling / 10.0).round() * 10.0
            };
            let success_rate = 0.25 + 0.7 * f64::from(flight) / f64::from(FLIGHTS);
            SampleLaunch {
                flight_number: flight,
                site: rng.pick(&SITES),
                class: u8::from(rng.unit() < success_rate),
                payload_mass_kg: payload,
                booster_version: format!("F9 {category} B{:04}", 1000 + flight),
                booster_category: category,
            }
        })
        .collect()
}

fn to_batch(rows: &[SampleLaunch]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(
            rows.iter().map(|r| i64::from(r.flight_number)),
        )),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.site))),
        Arc::new(Int64Array::from_iter_values(
            rows.iter().map(|r| i64::from(r.class)),
        )),
        Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.payload_mass_kg),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.booster_version.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.booster_category),
        )),
    ];

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn write_csv(path: &Path, rows: &[SampleLaunch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("spacex_launch_dash.csv"));

    let rows = generate(42);
    let batch = to_batch(&rows)?;

    match output.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(&output, &rows)?,
        Some("parquet") | Some("pq") => write_parquet(&output, &batch)?,
        _ => bail!("output must end in .csv or .parquet: {}", output.display()),
    }

    let preview = batch.slice(0, batch.num_rows().min(5));
    println!("{}", pretty_format_batches(&[preview])?);
    println!("Wrote {} launches to {}", rows.len(), output.display());
    Ok(())
}
