//! Integration tests for the sync pipeline.

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use tempfile::{TempDir, tempdir};

use bim_cli::config::SyncConfig;
use bim_cli::pipeline::{load_sheet_records, run_sync};
use bim_cli::types::SyncRequest;
use bim_ingest::IngestOptions;
use bim_model::{AssetKey, CompareOptions, ComparisonStatus};
use bim_report::load_history;

const PIM_CSV: &str = "\
codigoEquipo,descripcion,marca,agrupacionMaximo,vidaUtil
A1,Pump,Grundfos,01_00_01,15
C3,Fan,X,02_02_04,10
D4,Motor,ABB,10_00_01,20
";

const MAXIMO_CSV: &str = "\
codigoEquipo,descripcion,marca,agrupacionMaximo,vidaUtil
B2,Valve,Belimo,01_00_01,
C3,Fan,Y,02_02_04,10
D4,Motor,ABB,10_00_01,20
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn request(dir: &TempDir) -> SyncRequest {
    SyncRequest {
        pim: write(dir.path(), "pim.csv", PIM_CSV),
        maximo: write(dir.path(), "maximo.csv", MAXIMO_CSV),
        reject: Vec::new(),
        export: Some(dir.path().join("comparativa.csv")),
        history: Some(dir.path().join("history.json")),
        user: "ana".to_string(),
        dry_run: false,
        compare: CompareOptions::default(),
        ingest: IngestOptions::default(),
    }
}

#[tokio::test]
async fn sync_exports_and_records_history() {
    let dir = tempdir().unwrap();
    let mut request = request(&dir);
    request.reject.push(AssetKey::new("B2").unwrap());
    let now = Utc.with_ymd_and_hms(2025, 4, 2, 11, 0, 0).unwrap();

    let outcome = run_sync(&request, now).await.unwrap();

    assert_eq!(outcome.pim_records, 3);
    assert_eq!(outcome.maximo_records, 3);
    assert_eq!(outcome.summary.total(), 3);
    assert_eq!(outcome.unchanged(), 1);
    assert_eq!(outcome.changed_groups, vec!["01_00_01", "02_02_04"]);

    let entry = outcome.entry.as_ref().unwrap();
    assert_eq!(entry.user, "ana");
    assert_eq!(entry.summary.new, 1);
    assert_eq!(entry.summary.modified, 1);
    assert_eq!(entry.summary.deleted, 0);

    let export = std::fs::read_to_string(dir.path().join("comparativa.csv")).unwrap();
    let rows: Vec<&str> = export.lines().collect();
    assert_eq!(rows.len(), 5);
    assert!(rows[2].starts_with(r#""Ignorar","Deleted","B2","Valve""#));

    let history = load_history(&dir.path().join("history.json")).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.latest(), Some(entry));
}

#[tokio::test]
async fn second_sync_prepends_to_history() {
    let dir = tempdir().unwrap();
    let request = request(&dir);
    let first = Utc.with_ymd_and_hms(2025, 4, 2, 11, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2025, 4, 3, 11, 0, 0).unwrap();

    run_sync(&request, first).await.unwrap();
    run_sync(&request, second).await.unwrap();

    let history = load_history(&dir.path().join("history.json")).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history.latest().map(|entry| entry.id),
        Some(second.timestamp_millis())
    );
}

#[tokio::test]
async fn dry_run_writes_no_history() {
    let dir = tempdir().unwrap();
    let mut request = request(&dir);
    request.dry_run = true;

    let outcome = run_sync(&request, Utc::now()).await.unwrap();

    assert!(outcome.entry.is_none());
    assert!(outcome.history.is_none());
    assert!(!dir.path().join("history.json").exists());
    assert!(dir.path().join("comparativa.csv").exists());
}

#[tokio::test]
async fn missing_input_file_is_reported() {
    let dir = tempdir().unwrap();
    let mut request = request(&dir);
    request.maximo = dir.path().join("absent.csv");

    let err = run_sync(&request, Utc::now()).await.unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[tokio::test]
async fn rejecting_an_unchanged_asset_fails() {
    let dir = tempdir().unwrap();
    let mut request = request(&dir);
    request.reject.push(AssetKey::new("D4").unwrap());

    let err = run_sync(&request, Utc::now()).await.unwrap_err();
    assert_eq!(err.to_string(), "reject D4");
    assert!(!dir.path().join("history.json").exists());
}

#[tokio::test]
async fn normalized_config_ignores_blank_versus_missing() {
    let dir = tempdir().unwrap();
    let pim = "codigoEquipo,descripcion\nE5,Boiler\n";
    let maximo = r#"[{"codigoEquipo": "E5", "descripcion": "Boiler", "vidaUtil": ""}]"#;
    let config_path = write(
        dir.path(),
        "config.json",
        r#"{"compare": {"equality": "normalized"}}"#,
    );
    let config = SyncConfig::load(&config_path).unwrap();

    let mut request = request(&dir);
    request.pim = write(dir.path(), "pim.csv", pim);
    request.maximo = write(dir.path(), "maximo.json", maximo);
    request.dry_run = true;

    let strict = run_sync(&request, Utc::now()).await.unwrap();
    assert_eq!(strict.comparison[0].status(), ComparisonStatus::Modified);

    request.compare = config.compare;
    let outcome = run_sync(&request, Utc::now()).await.unwrap();
    assert_eq!(outcome.comparison.len(), 1);
    assert_eq!(outcome.comparison[0].status(), ComparisonStatus::Unchanged);
}

#[test]
fn sheet_records_load_with_custom_key_column() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "maximo.csv",
        "assetnum,descripcion\nX1,Chiller\n",
    );
    let options = IngestOptions::default().with_key_column("assetnum");

    let records = load_sheet_records(&path, &options).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key.as_str(), "X1");
}
