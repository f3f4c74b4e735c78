//! Integration tests for asset file loading.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use bim_ingest::{
    AssetSource, FileAssetSource, IngestError, IngestOptions, StaticAssetSource, load_records,
    parse_asset_csv, parse_asset_json,
};
use bim_model::{AssetKey, AssetRecord, FieldValue};
use tempfile::tempdir;

const PIM_CSV: &str = "\
codigoEquipo,descripcion,marca,agrupacionMaximo,precioCompra,vidaUtil,fechaInstalacion
MAD-HVAC-001,Enfriadora,Carrier,01_00_01,15000,20,2021-03-15
MAD-HVAC-002,Fancoil,,01_00_02,850.5,15,
";

fn parse(text: &str, options: &IngestOptions) -> Result<Vec<AssetRecord>, IngestError> {
    parse_asset_csv(Cursor::new(text.as_bytes()), Path::new("pim.csv"), options)
}

#[test]
fn csv_rows_become_records() {
    let records = parse(PIM_CSV, &IngestOptions::default()).expect("parse csv");
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.key.as_str(), "MAD-HVAC-001");
    assert_eq!(first.get("precioCompra"), Some(&FieldValue::Number(15000.0)));
    assert_eq!(first.get("fechaInstalacion"), Some(&FieldValue::from("2021-03-15")));
    assert_eq!(first.agrupacion(), Some("01_00_01"));

    // Empty cells are left out rather than stored as blank text.
    let second = &records[1];
    assert!(second.get("marca").is_none());
    assert!(second.get("fechaInstalacion").is_none());
    assert_eq!(second.get("precioCompra"), Some(&FieldValue::Number(850.5)));
}

#[test]
fn csv_without_inference_keeps_text() {
    let options = IngestOptions::default().with_infer_values(false);
    let records = parse(PIM_CSV, &options).expect("parse csv");
    assert_eq!(records[0].get("precioCompra"), Some(&FieldValue::from("15000")));
}

#[test]
fn csv_custom_key_column_and_bom_header() {
    let text = "\u{feff}Codigo ,descripcion\nEQ-9,Bomba\n";
    let options = IngestOptions::default().with_key_column("codigo");
    let records = parse(text, &options).expect("parse csv");
    assert_eq!(records[0].key, AssetKey::new("EQ-9").unwrap());
    assert!(records[0].get("Codigo").is_none());
}

#[test]
fn csv_missing_key_column_is_an_error() {
    let error = parse("descripcion,marca\nBomba,Acme\n", &IngestOptions::default()).unwrap_err();
    assert!(matches!(error, IngestError::MissingColumn { ref column, .. } if column == "codigoEquipo"));
}

#[test]
fn csv_blank_key_reports_row_number() {
    let text = "codigoEquipo,descripcion\nEQ-1,Bomba\n ,Valvula\n";
    let error = parse(text, &IngestOptions::default()).unwrap_err();
    assert!(matches!(error, IngestError::InvalidRow { row: 3, .. }));
}

#[test]
fn csv_skips_fully_empty_rows() {
    let text = "codigoEquipo,descripcion\nEQ-1,Bomba\n,\nEQ-2,Valvula\n";
    let records = parse(text, &IngestOptions::default()).expect("parse csv");
    assert_eq!(records.len(), 2);
}

#[test]
fn csv_empty_input_is_an_error() {
    let error = parse("", &IngestOptions::default()).unwrap_err();
    assert!(matches!(error, IngestError::EmptyCsv { .. }));
}

#[test]
fn json_array_of_objects() {
    let text = r#"[
        {"codigoEquipo": "EQ-1", "descripcion": "Bomba", "precioCompra": 300},
        {"codigoEquipo": "EQ-2", "descripcion": null}
    ]"#;
    let records =
        parse_asset_json(text, Path::new("maximo.json"), &IngestOptions::default()).expect("json");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("descripcion"), Some(&FieldValue::Null));
}

#[test]
fn json_record_without_key_reports_position() {
    let text = r#"[{"codigoEquipo": "EQ-1"}, {"descripcion": "sin codigo"}]"#;
    let error =
        parse_asset_json(text, Path::new("maximo.json"), &IngestOptions::default()).unwrap_err();
    assert!(matches!(error, IngestError::InvalidRow { row: 2, .. }));
}

#[test]
fn load_dispatches_on_extension() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("pim.CSV");
    fs::write(&csv_path, PIM_CSV).unwrap();
    assert_eq!(load_records(&csv_path, &IngestOptions::default()).unwrap().len(), 2);

    let other = dir.path().join("pim.xlsx");
    fs::write(&other, "irrelevant").unwrap();
    assert!(matches!(
        load_records(&other, &IngestOptions::default()),
        Err(IngestError::UnsupportedFormat { .. })
    ));

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        load_records(&missing, &IngestOptions::default()),
        Err(IngestError::FileNotFound { .. })
    ));
}

#[test]
fn utf16_csv_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pim.csv");
    fs::write(&path, [0xFF, 0xFE, b'c', 0x00]).unwrap();
    assert!(matches!(
        load_records(&path, &IngestOptions::default()),
        Err(IngestError::UnsupportedEncoding { .. })
    ));
}

#[tokio::test]
async fn file_source_loads_off_the_runtime() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("maximo.csv");
    fs::write(&path, PIM_CSV).unwrap();
    let source = FileAssetSource::new(&path, IngestOptions::default());
    assert_eq!(source.describe(), path.display().to_string());
    let records = source.load().await.expect("load");
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn static_source_returns_its_records() {
    let record = AssetRecord::new(AssetKey::new("EQ-1").unwrap());
    let source = StaticAssetSource::new("memoria", vec![record.clone()]);
    assert_eq!(source.load().await.unwrap(), vec![record]);
}
