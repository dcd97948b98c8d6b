use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use launch_dash::data::error::LoadError;
use launch_dash::data::loader::load_file;
use launch_dash::data::model::{Outcome, PayloadBounds};
use parquet::arrow::ArrowWriter;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/launches.csv")
}

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn write_parquet(
    suffix: &str,
    schema: Arc<Schema>,
    columns: Vec<ArrayRef>,
) -> tempfile::NamedTempFile {
    let batch = RecordBatch::try_new(schema.clone(), columns).expect("batch");
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    let mut writer =
        ArrowWriter::try_new(file.reopen().expect("reopen"), schema, None).expect("writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close writer");
    file
}

fn launch_schema(payload: DataType, class: DataType, nullable: bool) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", class, nullable),
        Field::new("Payload Mass (kg)", payload, nullable),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]))
}

#[test]
fn csv_fixture_loads_with_index_column_ignored() {
    let ds = load_file(&fixture()).expect("load fixture");
    assert_eq!(ds.len(), 14);
    assert_eq!(
        ds.sites,
        vec!["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"]
    );
    assert_eq!(ds.payload_bounds, PayloadBounds { min: 0.0, max: 9600.0 });

    let categories: Vec<&str> = ds.booster_categories.iter().map(String::as_str).collect();
    assert_eq!(categories, vec!["B4", "B5", "FT", "v1.0", "v1.1"]);

    let first = &ds.records[0];
    assert_eq!(first.flight_number, Some(1));
    assert_eq!(first.outcome, Outcome::Failure);
    assert_eq!(first.booster_version.as_deref(), Some("F9 v1.0  B0003"));
    assert_eq!(ds.records[6].outcome, Outcome::Success);
}

#[test]
fn csv_without_optional_columns_loads() {
    let file = write_temp(
        ".csv",
        "Launch Site,class,Payload Mass (kg),Booster Version Category\n\
         KSC LC-39A,1,2490,FT\n\
         VAFB SLC-4E,0,500,v1.1\n",
    );
    let ds = load_file(file.path()).expect("load minimal csv");
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.records[0].flight_number, None);
    assert_eq!(ds.records[0].booster_version, None);
}

#[test]
fn csv_missing_required_column_is_fatal() {
    let file = write_temp(
        ".csv",
        "Launch Site,Payload Mass (kg),Booster Version Category\nKSC LC-39A,2490,FT\n",
    );
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::MissingColumn("class"))
    ));
}

#[test]
fn csv_invalid_class_is_fatal() {
    let file = write_temp(
        ".csv",
        "Launch Site,class,Payload Mass (kg),Booster Version Category\nKSC LC-39A,3,2490,FT\n",
    );
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::InvalidOutcome { row: 0, .. })
    ));
}

#[test]
fn csv_unparsable_payload_is_fatal() {
    let file = write_temp(
        ".csv",
        "Launch Site,class,Payload Mass (kg),Booster Version Category\nKSC LC-39A,1,heavy,FT\n",
    );
    assert!(load_file(file.path()).is_err());
}

#[test]
fn empty_csv_is_fatal() {
    let file = write_temp(
        ".csv",
        "Launch Site,class,Payload Mass (kg),Booster Version Category\n",
    );
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(err.downcast_ref::<LoadError>(), Some(LoadError::Empty)));
}

#[test]
fn json_records_load() {
    let file = write_temp(
        ".json",
        r#"[
            {"Flight Number": 1, "Launch Site": "CCAFS LC-40", "class": 0,
             "Payload Mass (kg)": 0.0, "Booster Version Category": "v1.0"},
            {"Flight Number": 2, "Launch Site": "KSC LC-39A", "class": 1,
             "Payload Mass (kg)": 5300, "Booster Version": "F9 FT B1021.2",
             "Booster Version Category": "FT"}
        ]"#,
    );
    let ds = load_file(file.path()).expect("load json");
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.records[1].outcome, Outcome::Success);
    assert_eq!(ds.records[1].payload_mass_kg, 5300.0);
    assert_eq!(ds.payload_bounds.max, 5300.0);
}

#[test]
fn json_invalid_class_is_fatal() {
    let file = write_temp(
        ".json",
        r#"[
            {"Launch Site": "KSC LC-39A", "class": 1,
             "Payload Mass (kg)": 2490, "Booster Version Category": "FT"},
            {"Launch Site": "KSC LC-39A", "class": 2,
             "Payload Mass (kg)": 5300, "Booster Version Category": "FT"}
        ]"#,
    );
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::InvalidOutcome { row: 1, .. })
    ));
}

#[test]
fn parquet_with_integer_columns_loads() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
        Field::new("Flight Number", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["CCAFS LC-40", "VAFB SLC-4E", "CCAFS LC-40"])),
        Arc::new(Int64Array::from(vec![1, 0, 1])),
        Arc::new(Float64Array::from(vec![3170.0, 500.0, 15600.0])),
        Arc::new(StringArray::from(vec!["v1.1", "v1.1", "B5"])),
        Arc::new(Int64Array::from(vec![7, 6, 55])),
    ];
    let file = write_parquet(".parquet", schema, columns);

    let ds = load_file(file.path()).expect("load parquet");
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.sites, vec!["CCAFS LC-40", "VAFB SLC-4E"]);
    assert_eq!(ds.records[2].flight_number, Some(55));
    assert_eq!(ds.records[1].outcome, Outcome::Failure);
    assert_eq!(ds.payload_bounds, PayloadBounds { min: 500.0, max: 15600.0 });
}

#[test]
fn parquet_missing_column_is_fatal() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["KSC LC-39A"])),
        Arc::new(Int64Array::from(vec![1])),
    ];
    let file = write_parquet(".parquet", schema, columns);

    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::MissingColumn("Payload Mass (kg)"))
    ));
}

#[test]
fn parquet_with_string_typed_numbers_loads() {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["CCAFS LC-40", "KSC LC-39A"])),
        Arc::new(StringArray::from(vec!["0", "1"])),
        Arc::new(StringArray::from(vec!["3170.0", "2490"])),
        Arc::new(StringArray::from(vec!["v1.1", "FT"])),
    ];
    let schema = launch_schema(DataType::Utf8, DataType::Utf8, false);
    let file = write_parquet(".parquet", schema, columns);

    let ds = load_file(file.path()).expect("load parquet");
    assert_eq!(ds.records[0].outcome, Outcome::Failure);
    assert_eq!(ds.records[1].outcome, Outcome::Success);
    assert_eq!(ds.payload_bounds, PayloadBounds { min: 2490.0, max: 3170.0 });
}

#[test]
fn parquet_null_in_required_column_is_fatal() {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["CCAFS LC-40", "KSC LC-39A"])),
        Arc::new(Int64Array::from(vec![Some(1), Some(0)])),
        Arc::new(Float64Array::from(vec![Some(500.0), None])),
        Arc::new(StringArray::from(vec!["v1.1", "FT"])),
    ];
    let schema = launch_schema(DataType::Float64, DataType::Int64, true);
    let file = write_parquet(".parquet", schema, columns);

    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::InvalidValue { row: 1, column: "Payload Mass (kg)" })
    ));
}

#[test]
fn parquet_unparsable_string_payload_is_fatal() {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["KSC LC-39A"])),
        Arc::new(StringArray::from(vec!["1"])),
        Arc::new(StringArray::from(vec!["heavy"])),
        Arc::new(StringArray::from(vec!["FT"])),
    ];
    let schema = launch_schema(DataType::Utf8, DataType::Utf8, false);
    let file = write_parquet(".parquet", schema, columns);

    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::InvalidValue { row: 0, column: "Payload Mass (kg)" })
    ));
}

#[test]
fn short_parquet_extension_is_accepted() {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["VAFB SLC-4E"])),
        Arc::new(Int64Array::from(vec![1])),
        Arc::new(Float64Array::from(vec![9600.0])),
        Arc::new(StringArray::from(vec!["FT"])),
    ];
    let schema = launch_schema(DataType::Float64, DataType::Int64, false);
    let file = write_parquet(".pq", schema, columns);

    let ds = load_file(file.path()).expect("load .pq");
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.sites, vec!["VAFB SLC-4E"]);
}
